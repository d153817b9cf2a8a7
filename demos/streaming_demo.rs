use furniture_recommender::{ResponseAggregator, ResponseFragment, streaming::StreamingJsonParser};
use std::fs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Streaming Response Aggregation Demo\n");
    println!("{}", "=".repeat(80));

    // Load a sample Vertex AI response
    let body = fs::read_to_string("tests/fixtures/vertex_response_stream.json")?;
    println!("\nOriginal Vertex AI Response:");
    println!("{}", body);

    println!("\n{}", "=".repeat(80));
    println!("\nParsing and Aggregating...\n");

    let mut parser = StreamingJsonParser::new();
    let mut aggregation = ResponseAggregator::concatenated().start();

    // Simulate chunked arrival
    for (i, chunk) in body.as_bytes().chunks(100).enumerate() {
        println!("Chunk {} ({} bytes)", i + 1, chunk.len());

        let parsed = parser.feed(chunk)?;
        if parsed.is_empty() {
            println!("   Incomplete - buffering...");
            continue;
        }

        for response in parsed {
            let fragment = ResponseFragment::new(response);
            let delta = aggregation.push(&fragment)?;
            println!("   + {:?}", delta);
        }
    }

    let result = aggregation.finish();
    println!("\n{}", "=".repeat(80));
    println!(
        "\n{} fragments ({} without text)\n",
        result.fragments, result.missing
    );
    println!("{}", result);

    Ok(())
}
