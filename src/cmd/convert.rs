use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use rxdoc::marshal::{ClassRegistry, DecodeOptions, Decoder, EncodeOptions, MarshalError, encode, rgss};

/// Behavior switches for the convert command.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
	/// Spaces per indentation level in the output.
	pub indent: usize,
	/// Maximum decode/encode recursion depth.
	pub max_depth: u32,
	/// Optional secondary sink for failure lines.
	pub log_file: Option<PathBuf>,
	/// Skip the built-in RGSS class hooks.
	pub no_rgss: bool,
	/// Fail on user dumps with no registered hook.
	pub strict_dumps: bool,
}

/// Convert a marshal file at `input` to pretty JSON at `output`.
///
/// Failures surface as the command's exit status and stderr message; when a
/// log file is configured, the failure line is appended there as well.
pub fn run(input: PathBuf, output: PathBuf, options: ConvertOptions) -> rxdoc::marshal::Result<()> {
	let outcome = convert(&input, &output, &options);
	if let Err(err) = &outcome
		&& let Some(log_path) = &options.log_file
	{
		append_log(log_path, &input, err);
	}
	outcome
}

fn convert(input: &Path, output: &Path, options: &ConvertOptions) -> rxdoc::marshal::Result<()> {
	let bytes = fs::read(input)?;

	let mut registry = ClassRegistry::new();
	if !options.no_rgss {
		rgss::register_defaults(&mut registry);
	}

	let decode_options = DecodeOptions {
		max_depth: options.max_depth,
		strict_dumps: options.strict_dumps,
		..DecodeOptions::default()
	};
	let document = Decoder::with_options(&registry, decode_options).decode(&bytes)?;

	let encode_options = EncodeOptions {
		indent: options.indent,
		max_depth: options.max_depth,
	};
	let mut text = encode(&document, &encode_options)?;
	text.push('\n');

	// the destination is only touched once decode and encode both succeeded
	fs::write(output, text)?;
	Ok(())
}

fn append_log(log_path: &Path, input: &Path, err: &MarshalError) {
	let line = format!("error converting {}: {err}\n", input.display());
	if let Ok(mut file) = fs::OpenOptions::new().create(true).append(true).open(log_path) {
		let _ = file.write_all(line.as_bytes());
	}
}
