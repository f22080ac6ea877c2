use criterion::{criterion_group, criterion_main, Criterion};
use happygen::{
    codegen::{AlexCodegen, HappyCodegen},
    grammar::Grammar,
    rules::{Alternative, Combinator, Element, Rule, Variable},
    schema::{NameRegex, Schema},
};

criterion_main!(benches);
criterion_group!(benches, bench_codegen);

const SIZE: usize = 200;

fn synthetic_schema() -> Schema {
    let keywords = (0..SIZE).map(|i| NameRegex::new(format!("KW{}", i), format!("kw{}", i)));
    let valued = [
        NameRegex::new("ID", "[a-z]+"),
        NameRegex::new("INT", "[0-9]+"),
        NameRegex::new("STR", "\\\".*\\\""),
        NameRegex::new("FLOAT", "[0-9]+\\.[0-9]+"),
    ];
    Schema::new(keywords.chain(valued)).unwrap()
}

fn synthetic_grammar() -> Grammar {
    let alternatives = (0..SIZE).map(|i| Alternative {
        variable: Variable::new(format!("stmt{}", i)),
        action: None,
    });
    let stmts = (0..SIZE).map(|i| {
        Rule::sequence(
            &format!("stmt{}", i),
            [
                Element::Token(format!("KW{}", i)),
                Element::Token("ID".into()),
                Element::Parametrized(Combinator::Optional, Variable::new("stmt")),
            ],
            "Ast.Stmt $2 $3",
        )
    });
    Grammar::new(std::iter::once(Rule::choice("stmt", alternatives)).chain(stmts)).unwrap()
}

fn bench_codegen(c: &mut Criterion) {
    let schema = synthetic_schema();
    let grammar = synthetic_grammar();

    let mut group = c.benchmark_group("codegen");
    group.bench_function("alex", |b| {
        b.iter(|| AlexCodegen::new(&schema).to_string());
    });
    group.bench_function("happy", |b| {
        b.iter(|| HappyCodegen::new(&schema, &grammar).to_string());
    });
    group.finish();
}
