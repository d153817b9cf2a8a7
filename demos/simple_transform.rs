use furniture_recommender::{
    models::GenerationConfig,
    scene::Scene,
    transform::{build_request, permissive_safety_settings},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let scene = Scene::living_room();
    let prompt = scene.prompt()?;

    println!("Prompt used:");
    println!("{}", prompt);
    println!("{}", "=".repeat(80));

    // Vision request: provider safety defaults
    let request = build_request(&prompt, &GenerationConfig::vision_default(), &[])?;
    println!("\nVision Request:");
    println!("{}", serde_json::to_string_pretty(&request)?);

    println!("\n{}", "=".repeat(80));

    // Text request: blocking disabled
    let text_request = furniture_recommender::transform::build_text_request(
        "Suggest a coffee table for a Scandinavian living room.",
        &GenerationConfig::text_default(),
        &permissive_safety_settings(),
    )?;
    println!("\nText Request:");
    println!("{}", serde_json::to_string_pretty(&text_request)?);

    Ok(())
}
