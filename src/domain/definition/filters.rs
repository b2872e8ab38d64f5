// Filter operations and the immutable registry that names them

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Value substituted when `unescape` meets malformed percent-encoding
pub const UNESCAPE_ERROR: &str = "UNESCAPE_ERROR";

/// A pure text transform applied to a captured value before it is stored.
///
/// Filters never fail: a filter that cannot do its job returns a sentinel
/// value instead.
pub trait FilterOperation: Send + Sync {
    fn name(&self) -> &str;
    fn apply(&self, value: &str) -> String;
}

/// Strip leading and trailing whitespace
pub struct TrimOp;

impl FilterOperation for TrimOp {
    fn name(&self) -> &str {
        "trim"
    }

    fn apply(&self, value: &str) -> String {
        value.trim().to_string()
    }
}

/// Percent-decode a URL-encoded string
pub struct UnescapeOp;

impl FilterOperation for UnescapeOp {
    fn name(&self) -> &str {
        "unescape"
    }

    fn apply(&self, value: &str) -> String {
        if !has_valid_percent_escapes(value) {
            return UNESCAPE_ERROR.to_string();
        }
        match urlencoding::decode(value) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => UNESCAPE_ERROR.to_string(),
        }
    }
}

// Every '%' must introduce exactly two hex digits
fn has_valid_percent_escapes(value: &str) -> bool {
    let bytes = value.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            match (bytes.get(i + 1), bytes.get(i + 2)) {
                (Some(hi), Some(lo)) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => i += 3,
                _ => return false,
            }
        } else {
            i += 1;
        }
    }
    true
}

pub struct LowercaseOp;

impl FilterOperation for LowercaseOp {
    fn name(&self) -> &str {
        "lowercase"
    }

    fn apply(&self, value: &str) -> String {
        value.to_lowercase()
    }
}

pub struct UppercaseOp;

impl FilterOperation for UppercaseOp {
    fn name(&self) -> &str {
        "uppercase"
    }

    fn apply(&self, value: &str) -> String {
        value.to_uppercase()
    }
}

/// Space out run-together words: a space goes before every capital letter,
/// every '&' and every 'x' that is followed by a digit. The first character
/// never gets a space.
pub struct RespaceOp;

impl FilterOperation for RespaceOp {
    fn name(&self) -> &str {
        "respace"
    }

    fn apply(&self, value: &str) -> String {
        let mut spaced = String::with_capacity(value.len() + 8);
        let mut chars = value.chars().peekable();
        let mut first = true;

        while let Some(ch) = chars.next() {
            let before_digit = chars.peek().map_or(false, |next| next.is_ascii_digit());
            if !first && (ch.is_ascii_uppercase() || ch == '&' || (ch == 'x' && before_digit)) {
                spaced.push(' ');
            }
            spaced.push(ch);
            first = false;
        }

        spaced
    }
}

/// Read the digits of a value as one base-10 integer, last digit least
/// significant. "£1.25" becomes "125".
pub struct PenceOp;

impl FilterOperation for PenceOp {
    fn name(&self) -> &str {
        "pence"
    }

    fn apply(&self, value: &str) -> String {
        let mut amount: u64 = 0;
        let mut unit: u64 = 1;

        let digits = value.chars().rev().filter_map(|ch| ch.to_digit(10));

        for digit in digits {
            amount = amount.saturating_add(unit.saturating_mul(u64::from(digit)));
            unit = unit.saturating_mul(10);
        }

        amount.to_string()
    }
}

/// Adapter that turns a closure into a named filter
pub struct FnFilter<F> {
    name: String,
    func: F,
}

impl<F> FnFilter<F>
where
    F: Fn(&str) -> String + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> FilterOperation for FnFilter<F>
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, value: &str) -> String {
        (self.func)(value)
    }
}

/// Immutable name to filter mapping.
///
/// Built once through `FilterRegistryBuilder`; to add filters, build a new
/// registry with `extend`.
#[derive(Clone)]
pub struct FilterRegistry {
    operations: HashMap<String, Arc<dyn FilterOperation>>,
}

impl FilterRegistry {
    pub fn builder() -> FilterRegistryBuilder {
        FilterRegistryBuilder::new()
    }

    /// A registry holding only the baseline filters
    pub fn new() -> Self {
        Self::builder().with_defaults().build()
    }

    /// A builder seeded with every filter in this registry
    pub fn extend(&self) -> FilterRegistryBuilder {
        FilterRegistryBuilder {
            operations: self.operations.clone(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn FilterOperation> {
        self.operations.get(name).map(|op| op.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.operations.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Run `value` through the named filters left to right. Unknown names
    /// leave the value as it is.
    pub fn apply_chain<'a>(&self, value: &str, names: impl IntoIterator<Item = &'a str>) -> String {
        let mut current = value.to_string();
        for name in names {
            match self.get(name) {
                Some(op) => current = op.apply(&current),
                None => tracing::trace!(filter = name, "skipping unknown filter"),
            }
        }
        current
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("filters", &self.names())
            .finish()
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub struct FilterRegistryBuilder {
    operations: HashMap<String, Arc<dyn FilterOperation>>,
}

impl FilterRegistryBuilder {
    /// An empty builder
    pub fn new() -> Self {
        Self {
            operations: HashMap::new(),
        }
    }

    pub fn with_defaults(self) -> Self {
        self.register(TrimOp)
            .register(UnescapeOp)
            .register(LowercaseOp)
            .register(UppercaseOp)
            .register(RespaceOp)
            .register(PenceOp)
    }

    /// Add a filter; a later registration under the same name replaces the
    /// earlier one
    pub fn register(mut self, op: impl FilterOperation + 'static) -> Self {
        self.operations.insert(op.name().to_string(), Arc::new(op));
        self
    }

    pub fn build(self) -> FilterRegistry {
        FilterRegistry {
            operations: self.operations,
        }
    }
}

impl Default for FilterRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
