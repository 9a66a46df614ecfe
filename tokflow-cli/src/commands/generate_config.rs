//! Generate config command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,
}

const TEMPLATE: &str = r#"# tokflow configuration

# When decoded text is held back instead of being emitted
[holdback]
# Trailing characters that defer emission until the next batch
soft_punctuation = [",", "!", ":", ";", "?"]

# Text a decoder produces for a character whose bytes have not all arrived
incomplete_marker = "\uFFFD"

# Emitting this character also clears the token cache
line_break = "\n"

# Force a flush after this many buffered tokens (unbounded when absent)
# max_pending_tokens = 256

# Options handed to the model
[generation]
max_length = 2048
max_context_length = 512
do_sample = true
top_k = 0
top_p = 0.7
temperature = 0.95
repetition_penalty = 1.0
num_threads = 0

[output]
# text, json or markdown
default_format = "text"
pretty_json = true
# Print "==> file <==" before each trace when replaying several
file_headers = true
"#;

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        use std::fs;

        println!("Generating configuration template...");
        println!("  Output file: {}", self.output.display());

        fs::write(&self.output, self.generate_template())
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Configuration template generated successfully!");
        println!();
        println!("Next steps:");
        println!("1. Edit the holdback rules and generation options");
        println!("2. Validate your configuration:");
        println!("   tokflow validate -c {}", self.output.display());
        println!("3. Use it for replay:");
        println!(
            "   tokflow replay -i trace.txt --vocab vocab.json -c {}",
            self.output.display()
        );

        Ok(())
    }

    /// Generate template configuration content
    fn generate_template(&self) -> &'static str {
        TEMPLATE
    }
}
