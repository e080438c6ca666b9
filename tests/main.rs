use cmdsyntax::{
    compile, Bindings, CommandLineParser, MatchMode, Order, StyleConfig, Syntax, SyntaxError,
    Value,
};
use rstest::rstest;

fn bindings(entries: Vec<(&str, Value)>) -> Bindings {
    entries
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

#[rstest]
#[case(vec!["a.txt"], bindings(vec![("infile", text("a.txt"))]))]
#[case(
    vec!["a.txt", "-o", "b.txt"],
    bindings(vec![("infile", text("a.txt")), ("o", Value::Present), ("outfile", text("b.txt"))])
)]
fn infile_outfile(#[case] tokens: Vec<&str>, #[case] expected: Bindings) {
    let syntax = Syntax::new("infile [-o outfile]").unwrap();
    assert_eq!(
        syntax.match_tokens(&tokens, Order::Any, MatchMode::AllMatches),
        vec![expected]
    );
}

#[rstest]
#[case(vec!["-a", "-b"])]
#[case(vec!["-b", "-a"])]
#[case(vec!["-ab"])]
#[case(vec!["-ba"])]
fn optionals_in_either_order(#[case] tokens: Vec<&str>) {
    let syntax = Syntax::new("[-a] [-b]").unwrap();
    assert_eq!(
        syntax.first_match(&tokens),
        Some(bindings(vec![("a", Value::Present), ("b", Value::Present)]))
    );
}

#[rstest]
#[case(vec!["-i", "in"], true)]
#[case(vec!["-o", "out"], true)]
#[case(vec!["-i", "in", "-o", "out"], false)]
#[case(vec![], false)]
fn exclusive_alternatives(#[case] tokens: Vec<&str>, #[case] matches: bool) {
    let syntax = Syntax::new("(-i infile)|(-o outfile)").unwrap();
    assert_eq!(syntax.first_match(&tokens).is_some(), matches);
}

#[rstest]
#[case(vec![], false)]
#[case(vec!["-y"], true)]
#[case(vec!["-z", "-x"], true)]
#[case(vec!["-y", "-z", "-x"], true)]
#[case(vec!["-x", "-x"], false)]
fn selection_needs_one(#[case] tokens: Vec<&str>, #[case] matches: bool) {
    let syntax = Syntax::new("{-x -y -z}").unwrap();
    assert_eq!(syntax.first_match(&tokens).is_some(), matches);
}

#[test]
fn definition_order() {
    let syntax = Syntax::new("[-a] [-b] [-c]").unwrap();
    let run = |tokens: &[&str]| {
        syntax
            .match_tokens(tokens, Order::Definition, MatchMode::FirstOnly)
            .len()
    };

    assert_eq!(run(&["-a", "-c"]), 1);
    assert_eq!(run(&["-b", "-c"]), 1);
    assert_eq!(run(&["-c", "-a"]), 0);
}

#[test]
fn unterminated_optional() {
    let error = Syntax::new("infile [-o outfile").unwrap_err();

    assert_eq!(
        error,
        SyntaxError::Unterminated {
            expected: ']',
            offset: 7
        }
    );
    assert_eq!(error.offset(), Some(7));
}

#[test]
fn nested_optionals_terminate() {
    let syntax = Syntax::new("[[[a] [b]] [[c]]] [[[d]]]").unwrap();

    assert!(syntax.first_match(&["x"]).is_some());
    assert!(syntax.first_match(&["w", "x", "y", "z"]).is_some());
    assert!(syntax.first_match(&["w", "x", "y", "z", "v"]).is_none());
}

#[rstest]
#[case("infile [-o outfile]")]
#[case("(-i infile)|(-o outfile)")]
#[case("[-a] [-b] [-c] {-x -y -z} <long name>")]
#[case(r#""add" [--to=dir] [[-v] [-q]] | "remove" file"#)]
#[case("-abc [-d | -e] ((a b) | [c])")]
#[case("{[a] [b]} | c [d] [e | f] [[g] [h]] | i")]
fn usage_recompiles(#[case] definition: &str) {
    let style = StyleConfig::default();
    let syntax = Syntax::new(definition).unwrap();

    let recompiled = compile(&syntax.usage(), &style).unwrap();

    assert_eq!(&recompiled, syntax.tree());
    assert_eq!(recompiled.render(&style), syntax.usage());
}

#[test]
fn collision_last_wins() {
    let syntax = Syntax::new("name name").unwrap();

    assert_eq!(
        syntax.first_match(&["first", "second"]),
        Some(bindings(vec![("name", text("second"))]))
    );
}

#[test]
fn form_submit_round_trip() {
    let syntax = Syntax::new("infile [-o outfile] [--level=n]").unwrap();
    let form = syntax.form();
    let matched = syntax
        .match_str("in.txt --level=2", Order::Any, MatchMode::FirstOnly)
        .unwrap();

    assert_eq!(form.submit(matched[0].clone()), Ok(matched[0].clone()));
    assert!(form.submit(bindings(vec![("level", Value::Present)])).is_err());
}

#[test]
fn command_line_parser() {
    let parser = CommandLineParser::new("convert")
        .syntax("(-l [-v] <UEF file>) | ([-name <stem>] [-v] <UEF file> <destination path>)")
        .style(
            StyleConfig::default()
                .allow_double(false)
                .allow_single_long(true)
                .expand_single(false),
        )
        .build_parser()
        .unwrap();

    let bindings = parser
        .parse_tokens(&["-name", "file", "game.uef", "out"])
        .unwrap();

    assert_eq!(bindings["name"], Value::Present);
    assert_eq!(bindings["stem"], text("file"));
    assert_eq!(bindings["UEF file"], text("game.uef"));
    assert_eq!(bindings["destination path"], text("out"));
}

#[test]
fn command_line_parser_invalid() {
    let result = CommandLineParser::new("program")
        .syntax("infile )")
        .build_parser();

    assert!(result.is_err());
}
