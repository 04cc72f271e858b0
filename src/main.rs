use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use grayscale_rs::image_pipeline::{
    ConversionConfig, GrayscalePipeline, TiffCompression, encode::DEFAULT_JPEG_QUALITY,
};
use grayscale_rs::logger::{self, error, info};
use grayscale_rs::preview;

#[derive(Parser, Debug)]
#[command(author, version, about = "Convert a color image to 8-bit grayscale")]
struct Args {
    /// Source image path (jpg/png/tiff/camera RAW/etc)
    #[arg(short, long)]
    input: PathBuf,

    /// Destination path, the extension selects the output format
    #[arg(short, long)]
    output: PathBuf,

    /// Show the result in the terminal and wait for a key press
    #[arg(long)]
    show: bool,

    /// JPEG output quality
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
    jpeg_quality: u8,

    /// TIFF output compression
    #[arg(long, value_enum, default_value_t = Compression::None)]
    tiff_compression: Compression,

    /// Reject images wider or taller than this many pixels
    #[arg(long)]
    max_dimension: Option<usize>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Compression {
    None,
    Lzw,
    DeflateFast,
    DeflateBalanced,
    DeflateBest,
}

impl From<Compression> for TiffCompression {
    fn from(value: Compression) -> Self {
        match value {
            Compression::None => TiffCompression::None,
            Compression::Lzw => TiffCompression::Lzw,
            Compression::DeflateFast => TiffCompression::DeflateFast,
            Compression::DeflateBalanced => TiffCompression::DeflateBalanced,
            Compression::DeflateBest => TiffCompression::DeflateBest,
        }
    }
}

fn main() -> ExitCode {
    logger::init("info");

    let args = Args::parse();

    let compression = TiffCompression::from(args.tiff_compression);
    let predictor = match compression {
        TiffCompression::None => None,
        _ => Some(2),
    };
    let config = ConversionConfig::builder()
        .jpeg_quality(args.jpeg_quality)
        .tiff_compression(compression)
        .predictor(predictor)
        .max_dimension(args.max_dimension)
        .build();
    let pipeline = GrayscalePipeline::new(config);

    let gray = match pipeline.convert_file(&args.input, &args.output) {
        Ok(gray) => {
            info!("Wrote {}", args.output.display());
            gray
        }
        Err(e) => {
            error!(kind = ?e.kind(), "Conversion failed: {}", e);
            return ExitCode::from(e.kind().exit_code());
        }
    };

    if args.show {
        if let Err(e) = preview::show(&gray) {
            error!("Preview failed: {:#}", e);
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["grayscale_rs", "--input", "mine.jpg", "--output", "mine_gray.jpg"])
            .unwrap();

        assert_eq!(args.input, PathBuf::from("mine.jpg"));
        assert_eq!(args.output, PathBuf::from("mine_gray.jpg"));
        assert!(!args.show);
        assert_eq!(args.jpeg_quality, DEFAULT_JPEG_QUALITY);
        assert!(matches!(args.tiff_compression, Compression::None));
        assert_eq!(args.max_dimension, None);
    }

    #[test]
    fn test_short_flags_and_options() {
        let args = Args::try_parse_from([
            "grayscale_rs",
            "-i",
            "a.png",
            "-o",
            "b.tiff",
            "--show",
            "--tiff-compression",
            "deflate-best",
            "--max-dimension",
            "4096",
        ])
        .unwrap();

        assert!(args.show);
        assert!(matches!(args.tiff_compression, Compression::DeflateBest));
        assert_eq!(args.max_dimension, Some(4096));
        assert_eq!(TiffCompression::from(args.tiff_compression), TiffCompression::DeflateBest);
    }

    #[test]
    fn test_jpeg_quality_range() {
        for quality in ["0", "101"] {
            let result = Args::try_parse_from([
                "grayscale_rs",
                "-i",
                "a.jpg",
                "-o",
                "b.jpg",
                "--jpeg-quality",
                quality,
            ]);
            assert!(result.is_err(), "quality {} accepted", quality);
        }
    }

    #[test]
    fn test_input_and_output_are_required() {
        assert!(Args::try_parse_from(["grayscale_rs", "-i", "a.jpg"]).is_err());
        assert!(Args::try_parse_from(["grayscale_rs", "-o", "b.jpg"]).is_err());
    }
}
