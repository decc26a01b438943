use csv::WriterBuilder;
use mealweek_shared::Result;
use mealweek_shared::mealplan::Ingredient;

const HEADER: [&str; 4] = ["Name", "Quantity", "Unit", "Section"];

/// Render shopping rows as CSV. Every field is double-quoted, inner quotes
/// are doubled, each record ends with `\n` (including the last).
pub fn csv(items: &[Ingredient]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());

    writer.write_record(HEADER).map_err(anyhow::Error::from)?;

    for item in items {
        let quantity = format_quantity(item.quantity);
        writer
            .write_record([
                item.name.as_str(),
                quantity.as_str(),
                item.unit.as_deref().unwrap_or_default(),
                item.section.as_deref().unwrap_or_default(),
            ])
            .map_err(anyhow::Error::from)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow::Error::from(err.into_error()))?;

    Ok(String::from_utf8(bytes).map_err(anyhow::Error::from)?)
}

// Whole quantities print without a decimal point, as they were entered.
fn format_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 && quantity.abs() < i64::MAX as f64 {
        format!("{}", quantity as i64)
    } else {
        quantity.to_string()
    }
}
