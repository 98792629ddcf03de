use clap::Args;
use pulsechrono_core::{IntentClassifier, KeywordClassifier};

#[derive(Args)]
pub struct ClassifyArgs {
    /// Phrase to classify (e.g. "switch to timer")
    #[arg(required = true, trailing_var_arg = true)]
    text: Vec<String>,
}

pub fn run(args: ClassifyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let phrase = args.text.join(" ");
    let intent = KeywordClassifier::new().classify(&phrase);
    tracing::debug!(%phrase, ?intent, "classified");
    println!("{}", serde_json::to_string(&intent)?);
    Ok(())
}
