use std::error::Error as StdError;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use barcode_engine::matrix::swap_red_blue;
use barcode_engine::{ops, ColorSpace, DecodeOptions, ImageDescriptor, Method, Prop, RawDescriptor, RawImage};
use image::ColorType;
use log::info;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(
    name = "barcode_engine",
    about = "Decodes barcodes and converts images from encoded files or raw pixel dumps."
)]
struct Opt {
    #[structopt(subcommand)]
    op: Op,
}

#[derive(StructOpt)]
enum Op {
    /// Decode QR codes.
    Qr {
        #[structopt(flatten)]
        input: Input,
    },
    /// Decode any supported symbology.
    Multi {
        #[structopt(flatten)]
        input: Input,

        #[structopt(long)]
        try_harder: bool,
    },
    /// Grayscale preprocessing: original, histogram or otsu.
    Preprocess {
        #[structopt(flatten)]
        input: Input,

        #[structopt(long, default_value = "original", parse(try_from_str = parse_method))]
        method: Method,

        #[structopt(flatten)]
        output: Output,
    },
    /// Normalize and write back in the detected channel order.
    Convert {
        #[structopt(flatten)]
        input: Input,

        #[structopt(flatten)]
        output: Output,
    },
    /// Scale both dimensions by a percentage in (0, 100].
    Resize {
        #[structopt(flatten)]
        input: Input,

        #[structopt(long)]
        percentage: f64,

        #[structopt(flatten)]
        output: Output,
    },
}

#[derive(StructOpt)]
struct Input {
    #[structopt(parse(from_os_str))]
    path: PathBuf,

    /// Treat the file as raw pixels of this width.
    #[structopt(long, requires = "height")]
    width: Option<u32>,

    #[structopt(long, requires = "width")]
    height: Option<u32>,

    #[structopt(long)]
    color_space: Option<String>,

    /// Channel count, or a legacy label such as `int8_RGB`.
    #[structopt(long)]
    channels: Option<String>,
}

impl Input {
    fn descriptor<'a>(&self, bytes: &'a [u8]) -> ImageDescriptor<'a> {
        let (width, height) = match (self.width, self.height) {
            (Some(w), Some(h)) => (w, h),
            _ => return bytes.into(),
        };

        let mut raw = RawDescriptor::new(bytes, width, height);
        if let Some(cs) = &self.color_space {
            raw = raw.color_space(cs);
        }
        if let Some(channels) = &self.channels {
            raw.channels = match channels.parse::<f64>() {
                Ok(n) => Prop::Number(n),
                Err(_) => Prop::Text(channels.clone()),
            };
        }
        raw.into()
    }
}

#[derive(StructOpt)]
struct Output {
    /// Save the result as PNG.
    #[structopt(long, parse(from_os_str))]
    output: Option<PathBuf>,
}

fn parse_method(s: &str) -> Result<Method, String> {
    match s {
        "original" => Ok(Method::Original),
        "histogram" => Ok(Method::Histogram),
        "otsu" => Ok(Method::Otsu),
        other => Err(format!("unknown method '{}'", other)),
    }
}

fn save_png(raw: &RawImage, path: &Path) -> Result<(), Box<dyn StdError>> {
    let mut data = raw.data.clone();
    let color = match raw.color_space {
        ColorSpace::Gray => ColorType::L8,
        ColorSpace::Rgb => ColorType::Rgb8,
        ColorSpace::Rgba => ColorType::Rgba8,
        ColorSpace::Bgr => {
            swap_red_blue(&mut data, 3);
            ColorType::Rgb8
        }
        ColorSpace::Bgra => {
            swap_red_blue(&mut data, 4);
            ColorType::Rgba8
        }
    };
    image::save_buffer(path, &data, raw.width, raw.height, color)?;
    info!("wrote {}", path.display());
    Ok(())
}

fn emit(raw: &RawImage, output: &Output) -> Result<(), Box<dyn StdError>> {
    println!(
        "{}x{} {} ({} bytes)",
        raw.width,
        raw.height,
        raw.color_space,
        raw.data.len()
    );
    match &output.output {
        Some(path) => save_png(raw, path),
        None => Ok(()),
    }
}

fn run(op: Op) -> Result<(), Box<dyn StdError>> {
    match op {
        Op::Qr { input } => {
            let bytes = fs::read(&input.path)?;
            println!("{}", ops::decode_qr(&input.descriptor(&bytes))?.to_json()?);
        }
        Op::Multi { input, try_harder } => {
            let bytes = fs::read(&input.path)?;
            let outcome = ops::decode_multi(&input.descriptor(&bytes), DecodeOptions { try_harder })?;
            println!("{}", outcome.to_json()?);
        }
        Op::Preprocess {
            input,
            method,
            output,
        } => {
            let bytes = fs::read(&input.path)?;
            emit(&ops::preprocess(&input.descriptor(&bytes), method)?, &output)?;
        }
        Op::Convert { input, output } => {
            let bytes = fs::read(&input.path)?;
            emit(&ops::convert(&input.descriptor(&bytes))?, &output)?;
        }
        Op::Resize {
            input,
            percentage,
            output,
        } => {
            let bytes = fs::read(&input.path)?;
            emit(&ops::resize(&input.descriptor(&bytes), percentage)?, &output)?;
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let opt = Opt::from_args();
    if let Err(e) = run(opt.op) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
