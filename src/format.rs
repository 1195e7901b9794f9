//! Minimal positional interpolation for flash message templates.
//!
//! Only two directives exist: `%s` substitutes the next argument
//! (stringified through `Display`), and `%%` is a literal percent sign.
//! Placeholders with no remaining argument stay verbatim; surplus arguments
//! are ignored. This is deliberately not a printf superset.

use std::fmt;

/// Substitute `%s` placeholders in `template` positionally from `args`.
///
/// # Examples
///
/// ```
/// use flash_middleware::format::interpolate;
///
/// assert_eq!(interpolate("Hello %s", &[&"Jared"]), "Hello Jared");
/// assert_eq!(interpolate("%s of %s", &[&3, &10]), "3 of 10");
/// assert_eq!(interpolate("100%% done", &[]), "100% done");
/// ```
pub fn interpolate(template: &str, args: &[&dyn fmt::Display]) -> String {
	let mut out = String::with_capacity(template.len());
	let mut args = args.iter();
	let mut chars = template.chars().peekable();

	while let Some(c) = chars.next() {
		if c != '%' {
			out.push(c);
			continue;
		}
		match chars.peek() {
			Some('s') => {
				chars.next();
				match args.next() {
					Some(arg) => out.push_str(&arg.to_string()),
					None => out.push_str("%s"),
				}
			}
			Some('%') => {
				chars.next();
				out.push('%');
			}
			// Unknown directive, or a trailing percent: keep as-is.
			_ => out.push('%'),
		}
	}
	out
}
