//! Command-line interface for batch encoding and decoding PNG files

use crate::codec::decoder::{SeedPolicy, decode_with_observer};
use crate::codec::encoder::{EncoderConfig, encode_with_observer};
use crate::codec::model::Model;
use crate::io::configuration::{
    DEFAULT_DECODE_ITERATIONS, DEFAULT_DOMAIN_STRIDE, DEFAULT_IMAGE_SIZE, DEFAULT_MAX_DOMAINS,
    DEFAULT_RANGE_SIZE, DEFAULT_SEED, DEFAULT_WINDOW_RADIUS, MODEL_EXTENSION, OUTPUT_SUFFIX,
};
use crate::io::error::{CodecError, Result, invalid_parameter};
use crate::io::image::{export_grayscale, load_grayscale};
use crate::io::progress::ProgressManager;
use crate::metrics::psnr;
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fractile")]
#[command(
    author,
    version,
    about = "Compress grayscale images with a fractal self-similarity codec"
)]
/// Command-line arguments for the codec tool
pub struct Cli {
    /// Input PNG file or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Random seed for candidate subsampling and random seed images
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Range block size; the working image must divide evenly by it
    #[arg(short, long, default_value_t = DEFAULT_RANGE_SIZE)]
    pub range_size: usize,

    /// Stride between candidate domain origins
    #[arg(short = 'd', long, default_value_t = DEFAULT_DOMAIN_STRIDE)]
    pub stride: usize,

    /// Per-axis search window radius in pixels (0 searches the whole image)
    #[arg(short, long, default_value_t = DEFAULT_WINDOW_RADIUS)]
    pub window: usize,

    /// Cap on candidate domains per range block (0 disables the cap)
    #[arg(short, long, default_value_t = DEFAULT_MAX_DOMAINS)]
    pub max_domains: usize,

    /// Number of decode iterations
    #[arg(short, long, default_value_t = DEFAULT_DECODE_ITERATIONS)]
    pub iterations: usize,

    /// Square working size the input is resized to before encoding
    #[arg(long, default_value_t = DEFAULT_IMAGE_SIZE)]
    pub size: usize,

    /// Seed the decoder with uniform random noise instead of flat gray
    #[arg(long)]
    pub random_init: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    const fn seed_policy(&self) -> SeedPolicy {
        if self.random_init {
            SeedPolicy::Random
        } else {
            SeedPolicy::Flat
        }
    }

    fn encoder_config(&self) -> EncoderConfig {
        EncoderConfig {
            range_size: self.range_size,
            domain_stride: self.stride,
            window_radius: (self.window > 0).then_some(self.window),
            max_domains_per_range: (self.max_domains > 0).then_some(self.max_domains),
        }
    }
}

/// Orchestrates batch encode/decode runs with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if target validation or any per-file codec step fails
    pub fn process(&mut self) -> Result<()> {
        let files = self.collect_files()?;

        if files.is_empty() {
            return Ok(());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for (index, file) in files.iter().enumerate() {
            self.process_file(file, index)?;
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        if self.cli.target.is_file() {
            if self.cli.target.extension().and_then(|s| s.to_str()) == Some("png") {
                if self.should_process_file(&self.cli.target) {
                    Ok(vec![self.cli.target.clone()])
                } else {
                    Ok(vec![])
                }
            } else {
                Err(invalid_parameter(
                    "target",
                    &self.cli.target.display(),
                    &"target file must be a PNG image",
                ))
            }
        } else if self.cli.target.is_dir() {
            let mut files = Vec::new();
            for entry in std::fs::read_dir(&self.cli.target)? {
                let path = entry?.path();
                if path.extension().and_then(|s| s.to_str()) == Some("png")
                    && self.should_process_file(&path)
                {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(invalid_parameter(
                "target",
                &self.cli.target.display(),
                &"target must be a PNG file or directory",
            ))
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = Self::get_output_path(input_path);
        if output_path.exists() {
            // Allow print for user feedback for skip messages
            #[allow(clippy::print_stderr)]
            if !self.cli.quiet {
                eprintln!("Skipping: {} (output exists)", input_path.display());
            }
            false
        } else {
            true
        }
    }

    // Allow print for the per-file fidelity report
    #[allow(clippy::print_stderr)]
    fn process_file(&mut self, input_path: &Path, index: usize) -> Result<()> {
        let output_path = Self::get_output_path(input_path);
        let model_path = Self::get_model_path(input_path);

        let source = load_grayscale(input_path, Some(self.cli.size))?;
        let (height, width) = source.dim();

        let grid_blocks = (height / self.cli.range_size.max(1))
            * (width / self.cli.range_size.max(1));
        let total_steps = grid_blocks + self.cli.iterations;

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_file(index, input_path, total_steps);
        }

        let mut rng = StdRng::seed_from_u64(self.cli.seed);
        let config = self.cli.encoder_config();

        let model = {
            let progress = &mut self.progress_manager;
            encode_with_observer(&source, &config, &mut rng, |completed, _| {
                if let Some(pm) = progress {
                    pm.update_step(index, completed);
                }
            })?
        };

        Self::write_model(&model, &model_path)?;

        let reconstruction = {
            let progress = &mut self.progress_manager;
            decode_with_observer(
                &model,
                self.cli.iterations,
                self.cli.seed_policy(),
                &mut rng,
                |completed, _| {
                    if let Some(pm) = progress {
                        pm.update_step(index, grid_blocks + completed);
                    }
                },
            )?
        };

        export_grayscale(
            &reconstruction,
            output_path
                .to_str()
                .ok_or_else(|| invalid_parameter("output", &output_path.display(), &"invalid path"))?,
        )?;

        let fidelity = psnr(&source, &reconstruction)?;
        let model_bytes = model.to_bytes().len();
        let raw_bytes = height * width;

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(index);
        }

        if !self.cli.quiet {
            eprintln!(
                "{}: PSNR {fidelity:.2} dB, model {model_bytes} bytes for {raw_bytes} pixels",
                input_path.display()
            );
        }

        Ok(())
    }

    fn write_model(model: &Model, path: &Path) -> Result<()> {
        std::fs::write(path, model.to_bytes()).map_err(|e| CodecError::FileSystem {
            path: path.to_path_buf(),
            operation: "write model",
            source: e,
        })
    }

    fn get_output_path(input_path: &Path) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let extension = input_path.extension().unwrap_or_default();
        let output_name = format!(
            "{}{}.{}",
            stem.to_string_lossy(),
            OUTPUT_SUFFIX,
            extension.to_string_lossy()
        );

        if let Some(parent) = input_path.parent() {
            parent.join(output_name)
        } else {
            PathBuf::from(output_name)
        }
    }

    fn get_model_path(input_path: &Path) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let model_name = format!("{}.{MODEL_EXTENSION}", stem.to_string_lossy());

        if let Some(parent) = input_path.parent() {
            parent.join(model_name)
        } else {
            PathBuf::from(model_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, FileProcessor};
    use clap::Parser;

    #[test]
    fn test_window_zero_disables_restriction() {
        let cli = Cli::parse_from(["fractile", "input.png", "--window", "0"]);
        let config = cli.encoder_config();
        assert!(config.window_radius.is_none());
    }

    #[test]
    fn test_max_domains_zero_disables_cap() {
        let cli = Cli::parse_from(["fractile", "input.png", "--max-domains", "0"]);
        let config = cli.encoder_config();
        assert!(config.max_domains_per_range.is_none());
    }

    #[test]
    fn test_output_path_derivation() {
        let output = FileProcessor::get_output_path(std::path::Path::new("dir/photo.png"));
        assert_eq!(output, std::path::PathBuf::from("dir/photo_result.png"));

        let model = FileProcessor::get_model_path(std::path::Path::new("dir/photo.png"));
        assert_eq!(model, std::path::PathBuf::from("dir/photo.frm"));
    }

    #[test]
    fn test_missing_target_is_an_error() {
        let cli = Cli::parse_from(["fractile", "no/such/place.png", "--quiet"]);
        let mut processor = FileProcessor::new(cli);
        assert!(processor.process().is_err());
    }
}
