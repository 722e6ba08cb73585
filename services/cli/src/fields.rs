use credit_intake::error::AppError;
use credit_intake::intake::{ApplicationData, FieldCatalog};

pub(crate) fn run_fields() -> Result<(), AppError> {
    println!("{}", render(&FieldCatalog::standard()));
    Ok(())
}

pub(crate) fn render(catalog: &FieldCatalog) -> String {
    let defaults = ApplicationData::default();
    let mut lines = Vec::new();

    for (index, spec) in catalog.specs().iter().enumerate() {
        lines.push(format!(
            "{:>2}. {:<24} {}",
            index + 1,
            spec.name.key(),
            spec.label()
        ));
        lines.push(format!("    accepts: {}", spec.rule.describe()));
        for option in spec.rule.options() {
            lines.push(format!("      {:<12} {}", option.value, option.label));
        }
        lines.push(format!(
            "    default: {}",
            defaults.display_value(spec.name)
        ));
    }

    lines.join("\n")
}
