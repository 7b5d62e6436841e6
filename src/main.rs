// katsuyo CLI - print a conjugation table for one word
//
// Usage: katsuyo [-d DIR] POS WORD [WORD]
//        katsuyo [-d DIR] --list
//
// POS is a part-of-speech code as used in wwwjdic / JMdict ("v1", "v5k",
// "adj-i", ...).  One word may be kanji or kana; two words are taken as
// kanji then kana.

use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use katsuyo::{combine_variants, conjugate, CellKey, ConjTables};

struct Args {
    dir: PathBuf,
    list: bool,
    pos: String,
    words: Vec<String>,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("katsuyo: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = parse_args()?;

    let tables = ConjTables::load(&args.dir)
        .with_context(|| format!("loading conjugation tables from {}", args.dir.display()))?;

    if args.list {
        print_pos_list(&tables);
        return Ok(());
    }

    let pos = tables.part_of_speech(&args.pos)?;
    let (kanji, kana) = split_word_args(&args.words);
    let forms = conjugate(kanji.as_deref(), kana.as_deref(), pos.id, &tables)?;
    let (merged, notes) = combine_variants(&forms, &tables);

    print_conjugations(&merged, &tables);

    if !notes.is_empty() {
        println!("Notes:");
        for id in notes {
            if let Some(note) = tables.note(id) {
                println!("[{}] -- {}", id, note.text);
            }
        }
    }

    Ok(())
}

fn parse_args() -> Result<Args> {
    let mut dir = PathBuf::from("data");
    let mut list = false;
    let mut positional: Vec<String> = Vec::new();

    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--list" => list = true,
            "-d" | "--dir" => {
                let value = iter
                    .next()
                    .with_context(|| format!("{arg} requires a directory argument"))?;
                dir = PathBuf::from(value);
            }
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            other if other.starts_with('-') => bail!("unknown option `{other}`"),
            other => {
                // users often separate kanji and reading with a Japanese
                // space, which the shell won't split
                for piece in other.split([' ', '\u{3000}']) {
                    if !piece.is_empty() {
                        positional.push(piece.to_string());
                    }
                }
            }
        }
    }

    if list {
        return Ok(Args {
            dir,
            list,
            pos: String::new(),
            words: Vec::new(),
        });
    }

    if positional.is_empty() {
        print_usage();
        bail!("argument POS is required if --list not given");
    }
    let pos = positional.remove(0);
    if positional.is_empty() || positional.len() > 2 {
        bail!("give one or two words to conjugate (got {})", positional.len());
    }

    Ok(Args {
        dir,
        list,
        pos,
        words: positional,
    })
}

/// One word could be either spelling: call it kanji if it contains any
/// codepoint at or above U+4000, kana otherwise.  Two words are taken in
/// kanji, kana order.
fn split_word_args(words: &[String]) -> (Option<String>, Option<String>) {
    match words {
        [only] => {
            if only.chars().any(|c| c as u32 >= 0x4000) {
                (Some(only.clone()), None)
            } else {
                (None, Some(only.clone()))
            }
        }
        [kanji, kana] => (Some(kanji.clone()), Some(kana.clone())),
        _ => (None, None),
    }
}

fn print_conjugations(merged: &std::collections::BTreeMap<CellKey, String>, tables: &ConjTables) {
    for (cell, text) in merged {
        let description = tables
            .kind(cell.conj)
            .map(|kind| kind.description.as_str())
            .unwrap_or("?");
        let label = match (cell.neg, cell.fml) {
            (false, false) => "aff-plain: ",
            (false, true) => "aff-formal:",
            (true, false) => "neg-plain: ",
            (true, true) => "neg-formal:",
        };
        println!("{description:<20} {label} {text}");
    }
}

fn print_pos_list(tables: &ConjTables) {
    println!("Conjugatable PoS values:");
    for pos in tables.conjugatable_parts_of_speech() {
        println!("{}\t{}", pos.keyword, pos.description);
    }
}

fn print_usage() {
    println!(
        "katsuyo {} - conjugate a Japanese word\n\
         \n\
         Usage: katsuyo [-d DIR] POS WORD [WORD]\n\
         \x20      katsuyo [-d DIR] --list\n\
         \n\
         POS          part-of-speech code as used in wwwjdic / JMdict\n\
         \x20            (run with --list for the valid values)\n\
         WORD         word to conjugate; give the kanji and/or kana form,\n\
         \x20            two words are taken as kanji then kana\n\
         \n\
         Options:\n\
         \x20 --list     print the conjugatable part-of-speech codes and exit\n\
         \x20 -d, --dir  directory holding the conjugation table files\n\
         \x20            (default: data)\n\
         \x20 -h, --help print this help message",
        katsuyo::VERSION
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_word_with_kanji_is_the_kanji_spelling() {
        let (kanji, kana) = split_word_args(&words(&["食べる"]));
        assert_eq!(kanji.as_deref(), Some("食べる"));
        assert_eq!(kana, None);
    }

    #[test]
    fn test_single_kana_word_is_the_kana_spelling() {
        let (kanji, kana) = split_word_args(&words(&["たべる"]));
        assert_eq!(kanji, None);
        assert_eq!(kana.as_deref(), Some("たべる"));
    }

    #[test]
    fn test_two_words_are_kanji_then_kana() {
        let (kanji, kana) = split_word_args(&words(&["食べる", "たべる"]));
        assert_eq!(kanji.as_deref(), Some("食べる"));
        assert_eq!(kana.as_deref(), Some("たべる"));
    }
}
