//! Stream a scripted completion through the pipeline

use tokflow_api::{build_prompt, GenerateOptions, Pipeline, ScriptedModel, Turn, VocabDecoder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let vocab = VocabDecoder::from_pieces([
        (0, "<prompt>"),
        (1, "<0xE4>"),
        (2, "<0xBD>"),
        (3, "<0xA0>"),
        (4, "好"),
        (5, "，"),
        (6, "有什么"),
        (7, "可以帮你"),
        (8, "？"),
        (9, "<0x0A>"),
    ]);
    let batches = vec![vec![0; 8], vec![1], vec![2, 3], vec![4, 5], vec![6], vec![7, 8], vec![9]];
    let pipeline = Pipeline::new(ScriptedModel::new(vocab, batches));

    let history = vec![Turn::new("早上好", "早上好！")];
    let prompt = build_prompt("你好", &history);
    println!("=== Prompt ===\n{prompt}\n");

    println!("=== Whole text ===\n{}", pipeline.generate_default(&prompt)?);

    println!("=== Streamed deltas ===");
    let mut stream = pipeline.stream_generate(prompt, GenerateOptions::default())?;
    for delta in stream.by_ref() {
        println!("{delta:?}");
    }
    let stats = stream.wait()?;
    println!(
        "\n{} tokens, {} notifications, {} holds",
        stats.tokens, stats.notifications, stats.holds
    );

    Ok(())
}
