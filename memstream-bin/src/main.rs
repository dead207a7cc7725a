use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use gumdrop::Options;
use serde::Serialize;

use memstream::codec::{decode_address, BufferSpec, PointerAddress};
use memstream::stream::{Mode, Stat, Whence};
use memstream::wrapper::memory_open;

#[derive(Debug, Options)]
struct Args {
    #[options(help = "print help message")]
    help: bool,

    #[options(command)]
    command: Option<Command>,
}

#[derive(Debug, Options)]
enum Command {
    #[options(help = "print the buffer specification for an address and size")]
    Encode(EncodeArgs),

    #[options(help = "parse a buffer specification")]
    Decode(DecodeArgs),

    #[options(help = "hex dump part of a file through a memory stream")]
    Dump(DumpArgs),

    #[options(help = "overwrite bytes of a file through a memory stream")]
    Patch(PatchArgs),
}

#[derive(Debug, Options)]
struct EncodeArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(free, required, help = "hexadecimal address, 0x prefix optional")]
    address: String,

    #[options(free, required, help = "region size in bytes")]
    size: u64,
}

#[derive(Debug, Options)]
struct DecodeArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(no_short, long = "json", help = "output in JSON format")]
    use_json: bool,

    #[options(free, required, help = "buffer specification")]
    specification: String,
}

#[derive(Debug, Options)]
struct DumpArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(help = "seek offset before reading")]
    offset: i64,

    #[options(short = "e", long = "from-end", help = "seek relative to the end of the file")]
    from_end: bool,

    #[options(help = "number of bytes to read (default: to end)")]
    length: Option<usize>,

    #[options(no_short, long = "json", help = "output in JSON format")]
    use_json: bool,

    #[options(free, required, help = "file to be dumped")]
    path: PathBuf,
}

#[derive(Debug, Options)]
struct PatchArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(help = "offset of the first byte to overwrite")]
    offset: u64,

    #[options(help = "text to write", required)]
    data: String,

    #[options(free, required, help = "file to be patched")]
    path: PathBuf,
}

#[derive(Serialize)]
struct DumpOutput {
    specification: String,
    stat: Stat,
    offset: u64,
    bytes: String,
    eof: bool,
}

fn encode(args: EncodeArgs) -> anyhow::Result<()> {
    let address = decode_address(&args.address)?;
    println!("{}", BufferSpec::new(address, args.size));
    Ok(())
}

fn decode(args: DecodeArgs) -> anyhow::Result<()> {
    let spec = BufferSpec::parse(&args.specification)?;

    if args.use_json {
        println!("{}", serde_json::to_string_pretty(&spec)?);
    } else {
        println!("address: {}", spec.address);
        println!("size:    {}", spec.size);
        match spec.end() {
            Some(end) => println!("end:     {}", end),
            None => println!("end:     (wraps the address space)"),
        }
    }

    Ok(())
}

fn load(path: &Path) -> anyhow::Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("reading {}", path.display()))
}

fn dump(args: DumpArgs) -> anyhow::Result<()> {
    let mut buffer = load(&args.path)?;
    let size = buffer.len() as u64;
    let ptr = buffer.as_mut_ptr();
    let spec = BufferSpec::new(PointerAddress::from_ptr(ptr), size);

    // `buffer` is neither moved nor touched until the handle is dropped.
    let mut stream = unsafe { memory_open(ptr, Mode::Read.as_str(), size) }?;

    let whence = if args.from_end {
        Whence::End
    } else {
        Whence::Start
    };
    let offset = stream.seek_to(args.offset, whence)?;
    let length = match args.length {
        Some(v) => v,
        None => (size - offset) as usize,
    };
    let bytes = stream.read_bytes(length)?;

    if args.use_json {
        let output = DumpOutput {
            specification: spec.to_string(),
            stat: stream.stat()?,
            offset,
            bytes: bytes.iter().map(|b| format!("{:02x}", b)).collect(),
            eof: stream.eof()?,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_hex(offset, &bytes);
    }

    Ok(())
}

fn print_hex(offset: u64, bytes: &[u8]) {
    for (i, line) in bytes.chunks(16).enumerate() {
        let hex = line
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(" ");
        let text = line
            .iter()
            .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
            .collect::<String>();
        println!("{:08x}  {:<47}  |{}|", offset + 16 * i as u64, hex, text);
    }
}

fn patch(args: PatchArgs) -> anyhow::Result<()> {
    let mut buffer = load(&args.path)?;
    let size = buffer.len() as u64;

    let written = {
        let mut stream =
            unsafe { memory_open(buffer.as_mut_ptr(), Mode::ReadWrite.as_str(), size) }?;
        let offset = i64::try_from(args.offset).unwrap_or(i64::MAX);
        stream.seek_to(offset, Whence::Start)?;
        stream.write_bytes(args.data.as_bytes())?
    };

    if written < args.data.len() as u64 {
        log::warn!(
            "{} of {} bytes did not fit in {}",
            args.data.len() as u64 - written,
            args.data.len(),
            args.path.display()
        );
    }

    fs::write(&args.path, &buffer).with_context(|| format!("writing {}", args.path.display()))?;
    println!("{} bytes written", written);

    Ok(())
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let args = Args::parse_args_default_or_exit();

    match args.command {
        None => Ok(()),
        Some(Command::Encode(args)) => encode(args),
        Some(Command::Decode(args)) => decode(args),
        Some(Command::Dump(args)) => dump(args),
        Some(Command::Patch(args)) => patch(args),
    }
}
