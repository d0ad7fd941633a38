//! 辞書を引くユーティリティ
//!
//! このバイナリは、標準入力から読み込んだ各行についてMeCab辞書を引き、
//! 指定された出力形式（lookup、chars、unknown）で結果を出力します。

use std::error::Error;
use std::io::{BufRead, BufWriter, Write};
use std::path::PathBuf;
use std::str::FromStr;

use mecabdic::{Dictionary, DictionaryOptions};

use clap::Parser;

/// 出力モード
#[derive(Clone, Debug)]
enum OutputMode {
    Lookup,
    Chars,
    Unknown,
}

impl FromStr for OutputMode {
    type Err = &'static str;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "lookup" => Ok(Self::Lookup),
            "chars" => Ok(Self::Chars),
            "unknown" => Ok(Self::Unknown),
            _ => Err("Could not parse a mode"),
        }
    }
}

/// コマンドライン引数
#[derive(Parser, Debug)]
#[clap(name = "lookup", about = "Looks up a compiled MeCab dictionary")]
struct Args {
    /// Dictionary directory containing char.bin, matrix.bin, sys.dic, and unk.dic.
    #[clap(short = 'd', long)]
    dicdir: PathBuf,

    /// Output mode. Choices are lookup, chars, and unknown.
    #[clap(short = 'O', long, default_value = "lookup")]
    output_mode: OutputMode,

    /// Maximum number of memoized entries per cache.
    #[clap(short = 'C', long, default_value = "1024")]
    cache_capacity: u64,
}

/// 各文字位置から始まるシステム辞書の一致を`surface\tfeature`形式で書き出す
fn write_lookup<W: Write>(out: &mut W, dict: &Dictionary, line: &str) -> Result<(), Box<dyn Error>> {
    for (i, _) in line.char_indices() {
        for m in dict.lookup(&line[i..])? {
            writeln!(out, "{}\t{}", m.surface, dict.word_feature(m.token_index)?)?;
        }
    }
    Ok(())
}

fn write_chars<W: Write>(out: &mut W, dict: &Dictionary, line: &str) -> Result<(), Box<dyn Error>> {
    for c in line.chars() {
        let cates = dict.categories_of(c)?;
        writeln!(
            out,
            "{c}\tU+{:04X}\t{}\t{}\tinvoke={}\tgroup={}\tlength={}",
            u32::from(c),
            cates.primary,
            cates.secondary.join(","),
            dict.is_always_invoked(cates.primary),
            dict.is_grouping(cates.primary),
            dict.max_group_length(cates.primary),
        )?;
    }
    Ok(())
}

fn write_unknown<W: Write>(out: &mut W, dict: &Dictionary, line: &str) -> Result<(), Box<dyn Error>> {
    for c in line.chars() {
        let cates = dict.categories_of(c)?;
        for e in dict.unknown_entries(cates.primary) {
            writeln!(
                out,
                "{c}\t{}\t{}\tleft_id={}\tright_id={}\tword_cost={}",
                cates.primary, e.feature, e.left_id, e.right_id, e.word_cost,
            )?;
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    eprintln!("Loading the dictionary...");
    let options = DictionaryOptions::default().cache_capacity(args.cache_capacity)?;
    let dict = Dictionary::from_dir_with_options(&args.dicdir, options)?;
    log::info!(
        "{} system tokens, {} unknown tokens",
        dict.system_lexicon().num_tokens(),
        dict.unknown_lexicon().num_tokens(),
    );

    eprintln!("Ready to look up");

    let is_tty = atty::is(atty::Stream::Stdout);

    let out = std::io::stdout();
    let mut out = BufWriter::new(out.lock());
    let lines = std::io::stdin().lock().lines();
    for line in lines {
        let line = line?;
        match args.output_mode {
            OutputMode::Lookup => write_lookup(&mut out, &dict, &line)?,
            OutputMode::Chars => write_chars(&mut out, &dict, &line)?,
            OutputMode::Unknown => write_unknown(&mut out, &dict, &line)?,
        }
        out.write_all(b"EOS\n")?;
        if is_tty {
            out.flush()?;
        }
    }

    Ok(())
}
