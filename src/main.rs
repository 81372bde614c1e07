use std::env;

use recipe_clipper::Clipper;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Get the URL from command-line arguments
    let args: Vec<String> = env::args().collect();
    let url = args.get(1).ok_or("Please provide a recipe URL as an argument")?;

    let clipper = Clipper::from_env()?;
    let recipe = clipper.extract(url)?;

    println!("{}", serde_json::to_string_pretty(&recipe)?);

    Ok(())
}
