// CLI demo: read HTML from stdin, print the text of every element matching
// the selector given as the first argument, one per line.

use std::env;
use std::io::{self, Read};
use std::process::ExitCode;

fn main() -> ExitCode {
    let Some(selector) = env::args().nth(1) else {
        eprintln!("usage: extract <selector>");
        return ExitCode::FAILURE;
    };

    let mut html = Vec::new();
    if let Err(err) = io::stdin().read_to_end(&mut html) {
        eprintln!("failed to read stdin: {err}");
        return ExitCode::FAILURE;
    }

    let doc = html_extract::parse(&html);
    match html_extract::query_selector_all_text(&doc, &selector) {
        Ok(matches) => {
            for text in matches {
                println!("{text}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("invalid selector {selector:?}: {err}");
            ExitCode::FAILURE
        }
    }
}
