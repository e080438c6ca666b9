use cmdsyntax::{CommandLineParser, StyleConfig, Value};

fn main() {
    let bindings = CommandLineParser::new("uef2inf")
        .syntax("(-l [-v] <UEF file>) | ([-name <stem>] [-v] <UEF file> <destination path>)")
        .style(
            StyleConfig::default()
                .allow_double(false)
                .allow_single_long(true)
                .expand_single(false),
        )
        .about("Lists or extracts the files in a UEF archive.")
        .build()
        .parse();

    let archive = bindings
        .get("UEF file")
        .and_then(Value::as_text)
        .unwrap_or_default();
    let verbose = bindings.contains_key("v");

    if bindings.contains_key("l") {
        println!("Listing the contents of '{archive}' (verbose: {verbose}).");
    } else {
        let destination = bindings
            .get("destination path")
            .and_then(Value::as_text)
            .unwrap_or_default();

        match bindings.get("stem").and_then(Value::as_text) {
            Some(stem) => println!(
                "Extracting '{archive}' into '{destination}' as {stem}1, {stem}2, ... (verbose: {verbose})."
            ),
            None => println!("Extracting '{archive}' into '{destination}' (verbose: {verbose})."),
        }
    }
}
