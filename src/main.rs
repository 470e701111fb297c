use aedt::{native_to_xml, xml_to_native, AedtError};

use std::io::{self, Read};

const USAGE: &str = "usage: aedt [--to-xml | --to-native] < input > output";

fn main() {
    let mut to_native = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--to-xml" => to_native = false,
            "--to-native" => to_native = true,
            _ => {
                eprintln!("{}", USAGE);
                std::process::exit(2);
            }
        }
    }

    let mut input = String::new();
    if let Err(err) = io::stdin().read_to_string(&mut input) {
        eprintln!("failed to read stdin: {}", err);
        std::process::exit(1);
    }

    let result = if to_native {
        xml_to_native(&input)
    } else {
        native_to_xml(&input)
    };

    match result {
        Ok(converted) => {
            for notice in &converted.notices {
                eprintln!("warning: {}", notice);
            }
            print!("{}", converted.output);
            if !converted.output.ends_with('\n') {
                println!();
            }
        }
        Err(err) => {
            report(&input, &err);
            std::process::exit(1);
        }
    }
}

/// Echo the offending line with a caret underline, the way a compiler
/// would point at it.
fn report(input: &str, err: &AedtError) {
    let Some(line_no) = err.line else {
        eprintln!("error: {}", err);
        return;
    };

    let line_text = input.lines().nth(line_no - 1).unwrap_or("");

    eprintln!("ERROR AT LINE {}:", line_no);
    eprintln!("{}", line_text);

    let mut underline = String::new();
    for ch in line_text.chars() {
        if ch.is_whitespace() {
            underline.push(ch);
        } else {
            break;
        }
    }
    underline.push('^');
    let marked = underline.chars().count();
    for _ in marked..line_text.chars().count() {
        underline.push('_');
    }

    eprintln!("{}", underline);
    eprintln!("{}", err.message);
}
