/// # transcode: Decoding Standard Input
///
/// This example reads UTF-8 from standard input with a deliberately small read
/// buffer and writes the decoded text to standard output. Passing `-v` logs
/// every read to standard error, and passing `-vv` also logs every decoded
/// chunk.
use std::io::{BufReader, Write};

use prettyutf::err::report;
use prettyutf::opt::{Options, Volume};
use prettyutf::Utf8Reader;

fn run() -> std::io::Result<()> {
    let volume = match std::env::args().nth(1).as_deref() {
        Some("-v") => Volume::Regular,
        Some("-vv") => Volume::Detailed,
        _ => Volume::Silent,
    };
    let options = Options::builder().volume(volume).read_buffer_size(64).build();

    let stdin = BufReader::new(std::io::stdin());
    let mut reader = Utf8Reader::with_options(&options, stdin);
    let mut stdout = std::io::stdout().lock();
    let mut units = [0_u16; 64];

    loop {
        let count = reader.read(&mut units)?;
        if count == 0 {
            break;
        }

        for c in char::decode_utf16(units[..count].iter().copied()) {
            let c = c.unwrap_or(char::REPLACEMENT_CHARACTER);
            write!(stdout, "{}", c)?;
        }
    }

    reader.close()?;
    stdout.flush()
}

fn main() {
    if let Err(err) = run() {
        let _ = writeln!(std::io::stderr(), "{}", report(&err));
        std::process::exit(1);
    }
}
