use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use qrxfer_core::codec;
use qrxfer_core::error::{Result, XferError};
use qrxfer_core::hash::sha3;
use qrxfer_core::source::{LineSource, ScanSource};
use qrxfer_core::wire::fragment::Fragment;
use qrxfer_core::{IngestOutcome, ReconstructionSession};
use serde_json::json;
use tracing::info;

fn open_sources(inputs: &[PathBuf]) -> Result<Vec<Box<dyn ScanSource>>> {
    if inputs.is_empty() {
        return Ok(vec![Box::new(LineSource::new(BufReader::new(io::stdin())))]);
    }
    inputs
        .iter()
        .map(|path| -> Result<Box<dyn ScanSource>> {
            if path.as_os_str() == "-" {
                Ok(Box::new(LineSource::new(BufReader::new(io::stdin()))))
            } else {
                Ok(Box::new(LineSource::new(BufReader::new(File::open(path)?))))
            }
        })
        .collect()
}

/// "Empty answer means no encryption."
fn prompt_password() -> Result<Option<String>> {
    eprint!("password (leave empty if none): ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let password = line.trim().to_string();
    Ok(if password.is_empty() { None } else { Some(password) })
}

/// Reject names that would escape the output directory.
fn safe_output_path(root: &Path, name: &str) -> Result<PathBuf> {
    let p = Path::new(name);
    if p.is_absolute() || name.contains("../") || name.contains("..\\") {
        return Err(XferError::Format(format!("unsafe file name: {name}")));
    }
    Ok(root.join(p))
}

pub fn handle_receive(
    inputs: Vec<PathBuf>,
    out: PathBuf,
    password: Option<String>,
    no_prompt: bool,
) -> Result<()> {
    let mut session = ReconstructionSession::new();
    session.set_password(password);

    // Ask exactly once per session, the first time fragment 0 shows up.
    let mut prompted = session.has_password() || no_prompt;
    for mut source in open_sources(&inputs)? {
        while let Some(text) = source.next_text() {
            let outcome = session.ingest(&text);
            if !prompted && matches!(outcome, IngestOutcome::Stored { index: 0 }) {
                session.set_password(prompt_password()?);
                prompted = true;
            }
        }
    }

    let file = session.reconstruct()?;
    let dest = safe_output_path(&out, &file.file_name)?;
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&dest, &file.bytes)?;
    println!(
        "{} ({} bytes) -> {}",
        file.file_name,
        file.bytes.len(),
        dest.display()
    );
    Ok(())
}

pub fn handle_inspect(inputs: Vec<PathBuf>) -> Result<()> {
    let mut rows = 0usize;
    for mut source in open_sources(&inputs)? {
        while let Some(text) = source.next_text() {
            match Fragment::parse(&text) {
                Ok(frag) => {
                    let total = frag.total.map_or_else(|| "-".to_string(), |t| t.to_string());
                    println!("#{:<6} total={:<6} wire_len={}", frag.index, total, frag.data.len());
                    rows += 1;
                }
                Err(e) => eprintln!("skipping: {e}"),
            }
        }
    }
    println!("{rows} record(s)");
    Ok(())
}

pub fn handle_make(
    input: PathBuf,
    out: PathBuf,
    block_size: usize,
    password: Option<String>,
    level: i32,
) -> Result<()> {
    if block_size == 0 {
        return Err(XferError::Format("block size must be non-zero".into()));
    }
    let bytes = fs::read(&input)?;
    let file_name = input
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| XferError::Format(format!("unusable input name: {}", input.display())))?
        .to_string();

    let blocks: Vec<&[u8]> = bytes.chunks(block_size).collect();
    let total_blocks = blocks.len() as u32;
    let password = password.as_deref();

    let meta = json!({
        "file_name": file_name,
        "total_blocks": total_blocks,
        "hash": sha3::digest_hex(&bytes),
    });
    let meta_payload = codec::encode_payload(meta.to_string().as_bytes(), password, level)?;

    let mut writer: Box<dyn Write> = if out.as_os_str() == "-" {
        Box::new(io::stdout().lock())
    } else {
        Box::new(File::create(&out)?)
    };

    writeln!(
        writer,
        "{}",
        json!({ "index": 0, "total": total_blocks, "data": meta_payload })
    )?;
    for (i, block) in blocks.iter().enumerate() {
        let payload = codec::encode_payload(block, password, level)?;
        writeln!(
            writer,
            "{}",
            json!({ "index": i as u32 + 1, "total": total_blocks, "data": payload })
        )?;
    }

    info!(file = %file_name, blocks = total_blocks, "fragment records written");
    Ok(())
}
