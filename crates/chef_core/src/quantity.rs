//! Free-text ingredient quantity parsing and serving-size scaling.
//!
//! Parsing is deliberately permissive: the first whitespace token is the
//! magnitude when it reads as a decimal number (`.` or `,` separator) and the
//! second token, if any, is taken verbatim as the unit. Anything that does not
//! start with a number is kept as-is and never scaled.

/// Parsed view of a recipe-authored amount such as `"2 cups flour"`.
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientQuantity {
    magnitude: Option<f64>,
    unit: Option<String>,
    original: String,
}

impl IngredientQuantity {
    pub fn magnitude(&self) -> Option<f64> {
        self.magnitude
    }

    /// Unit token. Only ever present together with a magnitude.
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn is_measured(&self) -> bool {
        self.magnitude.is_some()
    }

    /// Rescales the magnitude by `factor`, formatted with exactly one decimal
    /// place. Unmeasured quantities come back unchanged.
    pub fn scaled(&self, factor: f64) -> String {
        let Some(magnitude) = self.magnitude else {
            return self.original.clone();
        };

        let consumed = if self.unit.is_some() { 2 } else { 1 };
        let mut parts = vec![format!("{:.1}", magnitude * factor)];
        if let Some(unit) = &self.unit {
            parts.push(unit.clone());
        }
        let rest = self
            .original
            .split_whitespace()
            .skip(consumed)
            .collect::<Vec<_>>()
            .join(" ");
        if !rest.is_empty() {
            parts.push(rest);
        }
        parts.join(" ")
    }
}

pub fn parse_quantity(text: &str) -> IngredientQuantity {
    let mut tokens = text.split_whitespace();
    let magnitude = tokens.next().and_then(parse_magnitude);
    let unit = match magnitude {
        Some(_) => tokens.next().map(ToOwned::to_owned),
        None => None,
    };

    IngredientQuantity {
        magnitude,
        unit,
        original: text.to_string(),
    }
}

/// Parses `text` and rescales it by `factor`; see [`IngredientQuantity::scaled`].
pub fn scale(text: &str, factor: f64) -> String {
    parse_quantity(text).scaled(factor)
}

/// Ratio of current to recipe-authored servings. A non-positive authored
/// count yields `1.0` so amounts are shown as written.
pub fn serving_factor(current: u32, original: u32) -> f64 {
    if original == 0 {
        return 1.0;
    }
    f64::from(current) / f64::from(original)
}

fn parse_magnitude(token: &str) -> Option<f64> {
    token
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
