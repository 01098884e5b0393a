use anyhow::Context;

use postmap_core::AppConfig;
use postmap_schema::{FunctionRegistry, SchemaRegistry};

pub(crate) fn run_schemas(config: &AppConfig) -> anyhow::Result<()> {
    let registry = SchemaRegistry::load(&config.schema_dir)
        .with_context(|| format!("failed to load schemas from {}", config.schema_dir.display()))?;
    let functions = FunctionRegistry::builtin();

    if registry.is_empty() {
        println!("no schemas found in {}", config.schema_dir.display());
        return Ok(());
    }

    for schema in registry.schemas() {
        let unknown = schema.unknown_functions(&functions);
        println!(
            "{} ({} mappings, {} computed fields)",
            schema.key(),
            schema.mappings().count(),
            schema.computed_fields.len()
        );
        for missing in &unknown {
            tracing::warn!(
                schema = %schema.key(),
                function = %missing.name,
                "schema references unknown function"
            );
            println!("  unknown {missing}");
        }
    }
    Ok(())
}
