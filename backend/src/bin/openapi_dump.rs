//! Print the OpenAPI document as YAML.

use std::io::Write;

use beerorder::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let yaml = ApiDoc::openapi().to_yaml()?;
    std::io::stdout().lock().write_all(yaml.as_bytes())?;
    Ok(())
}
