//! Template-related functionality: rendering filtered views through
//! [Handlebars](https://handlebarsjs.com/) templates.

use std::collections::HashMap;

use eyre::Result;
use handlebars::{
    Context, Handlebars, Helper, HelperResult, Output, RenderContext, RenderError,
};
use log::debug;
use serde_json::Value as JsonValue;

use crate::{DateTime, Error, Record, Value};

/// A collection of named templates, each of which renders a single record,
/// along with the placeholder shown when there is nothing to render.
pub struct Templates<'reg> {
    hb: Handlebars<'reg>,
    // Maps template names -> placeholders for empty results.
    empty: HashMap<String, String>,
}

impl<'reg> Default for Templates<'reg> {
    fn default() -> Self {
        let mut hb = Handlebars::new();
        hb.register_escape_fn(handlebars::no_escape);
        hb.register_helper("format_date", Box::new(format_date));
        hb.register_helper("format_time", Box::new(format_time));
        hb.register_helper("pad", Box::new(pad));
        hb.register_helper("money", Box::new(money));
        hb.register_helper("currency", Box::new(currency));
        hb.register_helper("percent", Box::new(percent));
        hb.register_helper("duration_hours", Box::new(duration_hours));
        Self {
            hb,
            empty: HashMap::new(),
        }
    }
}

impl<'reg> Templates<'reg> {
    /// Compiles the given template and registers it under the given name,
    /// replacing any existing template with the same name.
    pub fn register<N, T, E>(&mut self, name: N, template: T, empty: E) -> Result<()>
    where
        N: AsRef<str>,
        T: AsRef<str>,
        E: AsRef<str>,
    {
        let name = name.as_ref();
        self.hb
            .register_template_string(name, template.as_ref())
            .map_err(|e| Error::TemplateParse(name.to_string(), Box::new(e)))?;
        self.empty
            .insert(name.to_string(), empty.as_ref().to_string());
        debug!("Registered template {}", name);
        Ok(())
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.hb.has_template(name)
    }

    /// Renders each of the given records through the named template, one
    /// block per record. If there are no records, the template's placeholder
    /// is rendered instead.
    pub fn render_records(&self, name: &str, records: &[&Record]) -> Result<String> {
        if records.is_empty() {
            return Ok(self.empty.get(name).cloned().unwrap_or_default());
        }
        let blocks = records
            .iter()
            .map(|record| {
                self.hb
                    .render(name, record)
                    .map(|s| s.trim_end().to_string())
                    .map_err(|e| Error::TemplateRender(name.to_string(), e))
            })
            .collect::<Result<Vec<String>, Error>>()?;
        Ok(blocks.join("\n\n"))
    }
}

fn param<'a>(h: &'a Helper, idx: usize, helper: &str) -> Result<&'a JsonValue, RenderError> {
    h.param(idx).map(|p| p.value()).ok_or_else(|| {
        RenderError::new(format!("{}: missing parameter {}", helper, idx + 1))
    })
}

fn param_date_time(h: &Helper, idx: usize, helper: &str) -> Result<DateTime, RenderError> {
    let raw = param(h, idx, helper)?;
    raw.as_str()
        .and_then(|s| Value::from(s).as_date_time())
        .ok_or_else(|| RenderError::new(format!("{}: cannot parse date from {}", helper, raw)))
}

fn param_f64(h: &Helper, idx: usize, helper: &str) -> Result<f64, RenderError> {
    let raw = param(h, idx, helper)?;
    raw.as_f64()
        .ok_or_else(|| RenderError::new(format!("{}: expected a number, got {}", helper, raw)))
}

/// Parses a string as a date (or timestamp) and formats it as a short date.
///
/// Usage:
///
/// ```handlebars
/// {{ format_date "2025-04-20T09:00:00" }}
/// ```
///
/// Produces `Apr 20, 2025`.
pub fn format_date(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let dt = param_date_time(h, 0, "format_date")?;
    out.write(&dt.to_display_date())?;
    Ok(())
}

/// Parses a string as a timestamp and formats its time on a 12-hour clock.
///
/// Usage:
///
/// ```handlebars
/// {{ format_time "2025-04-15T15:30:00" }}
/// ```
///
/// Produces `3:30 PM`.
pub fn format_time(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let dt = param_date_time(h, 0, "format_time")?;
    out.write(&dt.to_display_time())?;
    Ok(())
}

/// Pad a string with a given character or string until it meets the specified
/// length.
///
/// Usage:
///
/// ```handlebars
/// {{ pad "2" "0" 2 }}
/// ```
///
/// Produces `02`. Parameters are in the format
/// `{{ pad string paddingCharOrString desiredMinLength }}`
pub fn pad(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let s = match param(h, 0, "pad")? {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    };
    let padding = param(h, 1, "pad")?.as_str().unwrap_or(" ");
    let min_len = param(h, 2, "pad")?.as_u64().unwrap_or(0) as usize;
    let mut prefix = String::new();
    let len = s.chars().count();
    if !padding.is_empty() {
        while len + prefix.chars().count() < min_len {
            prefix.push_str(padding);
        }
    }
    out.write(&prefix)?;
    out.write(&s)?;
    Ok(())
}

/// Formats a number as US dollars.
///
/// Usage:
///
/// ```handlebars
/// {{ money 5000 true }}
/// ```
///
/// Produces `+$5,000`. The optional second parameter forces a sign on
/// positive amounts.
pub fn money(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let amount = param_f64(h, 0, "money")?;
    let signed = h
        .param(1)
        .and_then(|p| p.value().as_bool())
        .unwrap_or(false);
    out.write(&crate::budget::format_money(amount, signed))?;
    Ok(())
}

/// Formats a number as US dollars, always with cents.
///
/// Usage:
///
/// ```handlebars
/// {{ currency amount true }}
/// ```
///
/// Produces `+$5,000.00` for an amount of 5000.
pub fn currency(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let amount = param_f64(h, 0, "currency")?;
    let signed = h
        .param(1)
        .and_then(|p| p.value().as_bool())
        .unwrap_or(false);
    out.write(&crate::budget::format_currency(amount, signed))?;
    Ok(())
}

/// Rounded percentage of one number relative to another.
///
/// Usage:
///
/// ```handlebars
/// {{ percent registered capacity }}
/// ```
pub fn percent(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let part = param_f64(h, 0, "percent")?;
    let whole = param_f64(h, 1, "percent")?;
    let pct = if whole == 0.0 {
        0
    } else {
        (part / whole * 100.0).round() as i64
    };
    out.write(&pct.to_string())?;
    Ok(())
}

/// Whole number of hours between two timestamps, rounded.
///
/// Usage:
///
/// ```handlebars
/// {{ duration_hours date end_date }}
/// ```
pub fn duration_hours(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let start = param_date_time(h, 0, "duration_hours")?;
    let end = param_date_time(h, 1, "duration_hours")?;
    let hours = (end.seconds_since(&start) as f64 / 3600.0).round() as i64;
    out.write(&hours.to_string())?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{seed, Query};

    fn templates() -> Templates<'static> {
        let mut t = Templates::default();
        t.register("events", include_str!("../templates/events.hbs"), "No events.")
            .unwrap();
        t.register(
            "transactions",
            include_str!("../templates/transactions.hbs"),
            "No transactions.",
        )
        .unwrap();
        t
    }

    #[test]
    fn render_event_with_helpers() {
        let events = seed::events().unwrap();
        let hackathon = events.get(1).unwrap();
        let rendered = templates().render_records("events", &[hackathon]).unwrap();
        assert_eq!(
            rendered,
            "Annual Hackathon 2025 [Competition]\n  \
             Apr 20, 2025 - 9:00 AM (24h) @ Main Auditorium\n  \
             85/100 registered (85%), organized by Alex Johnson"
        );
    }

    #[test]
    fn render_transactions_padded() {
        let transactions = seed::transactions().unwrap();
        let records = transactions.iter().take(3).collect::<Vec<_>>();
        let rendered = templates()
            .render_records("transactions", &records)
            .unwrap();
        let lines = rendered.split("\n\n").collect::<Vec<_>>();
        assert_eq!(
            lines,
            vec![
                "Apr 2, 2025   -$1,200.00  Hackathon Prizes (Events)",
                "Mar 28, 2025     -$800.00  T-shirt Printing (Promotional)",
                "Mar 15, 2025   +$5,000.00  Department Funding (Income)",
            ]
        );
    }

    #[test]
    fn empty_results_render_placeholder() {
        let events = seed::events().unwrap();
        let none = seed::events_view().filter(
            &events,
            &Query::new().with_text("no such event"),
            DateTime::now(),
        );
        assert_eq!(templates().render_records("events", &none).unwrap(), "No events.");
    }

    #[test]
    fn bad_templates_are_rejected() {
        let mut t = Templates::default();
        assert!(t.register("broken", "{{#if}}", "").is_err());
        assert!(!t.has_template("broken"));
    }
}
