//! Expansion of bracketed tags embedded in fixture strings.
//!
//! Tag kinds are processed in a fixed order: `CONF`, `CTXT`, `SHA256`,
//! `BASE64`, then `NOW`. Every occurrence of one kind is replaced before the
//! next kind is scanned, so a configuration value that itself contains
//! `[CTXT:...]` is expanded further within the same call.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

use crate::{PathMap, ScenarioStore, Value};

/// Full-string literals mapped to native values.
const SENTINELS: [(&str, Sentinel); 4] = [
    ("[TRUE]", Sentinel::True),
    ("[FALSE]", Sentinel::False),
    ("[NULL]", Sentinel::Null),
    ("[EMPTY]", Sentinel::Empty),
];

#[derive(Clone, Copy)]
enum Sentinel {
    True,
    False,
    Null,
    Empty,
}

impl Sentinel {
    fn parse(s: &str) -> Option<Self> {
        SENTINELS
            .iter()
            .find(|(literal, _)| *literal == s)
            .map(|(_, sentinel)| *sentinel)
    }

    fn value(self) -> Value {
        match self {
            Self::True => Value::Bool(true),
            Self::False => Value::Bool(false),
            Self::Null => Value::Null,
            Self::Empty => Value::String(String::new()),
        }
    }

    /// Text substituted when the sentinel appears inside a longer string.
    const fn inline(self) -> &'static str {
        match self {
            Self::True => "true",
            Self::False => "false",
            Self::Null => "null",
            Self::Empty => "",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TagKind {
    Conf,
    Ctxt,
    Sha256,
    Base64,
    Now,
}

impl TagKind {
    const ORDER: [Self; 5] = [Self::Conf, Self::Ctxt, Self::Sha256, Self::Base64, Self::Now];

    const fn opening(self) -> &'static str {
        match self {
            Self::Conf => "[CONF:",
            Self::Ctxt => "[CTXT:",
            Self::Sha256 => "[SHA256:",
            Self::Base64 => "[BASE64:",
            Self::Now => "[NOW:",
        }
    }
}

/// A tag occurrence found while scanning.
struct Tag<'s> {
    token: &'s str,
    content: &'s str,
}

/// Find every complete `kind` tag in `s`, in order of appearance.
///
/// Scanning stops at the first opening without a closing `]`; such text is
/// left untouched.
fn scan(kind: TagKind, s: &str) -> Vec<Tag<'_>> {
    let opening = kind.opening();
    let mut tags = Vec::new();
    let mut rest = s;
    let mut offset = 0;
    while let Some(start) = rest.find(opening) {
        let content_start = start + opening.len();
        let Some(len) = rest.get(content_start..).and_then(|tail| tail.find(']')) else {
            break;
        };
        let end = content_start + len;
        if let (Some(token), Some(content)) = (
            s.get(offset + start..=offset + end),
            s.get(offset + content_start..offset + end),
        ) {
            tags.push(Tag { token, content });
        }
        offset += end + 1;
        rest = s.get(offset..).unwrap_or_default();
    }
    tags
}

/// Expands tags against an environment document and a scenario store.
///
/// The resolver only borrows its collaborators, so neither can be mutated
/// while a resolution is in progress.
///
/// ```rust
/// use tagbind::{PathMap, Resolver, ScenarioStore, Value};
///
/// let environment = PathMap::from_json_str(r#"{"minio": true, "host": "localhost"}"#)?;
/// let mut scenario = ScenarioStore::new();
/// scenario.put("user", "alice");
/// let resolver = Resolver::new(&environment, &scenario);
///
/// assert_eq!(resolver.resolve("[CONF:minio]"), Value::Bool(true));
/// assert_eq!(resolver.resolve("prefix-[CONF:minio]"), Value::from("prefix-true"));
/// assert_eq!(
///     resolver.resolve_as_string("http://[CONF:host]/users/[CTXT:user]"),
///     "http://localhost/users/alice"
/// );
/// # Ok::<_, serde_json::Error>(())
/// ```
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
    environment: &'a PathMap,
    scenario: &'a ScenarioStore,
    clock: fn() -> OffsetDateTime,
}

impl<'a> Resolver<'a> {
    /// Build a resolver over `environment` and `scenario`.
    #[must_use]
    pub fn new(environment: &'a PathMap, scenario: &'a ScenarioStore) -> Self {
        Self {
            environment,
            scenario,
            clock: OffsetDateTime::now_utc,
        }
    }

    /// Replace the clock consulted by `NOW` tags.
    #[must_use]
    pub const fn with_clock(mut self, clock: fn() -> OffsetDateTime) -> Self {
        self.clock = clock;
        self
    }

    /// Resolve `s` into a value.
    ///
    /// The four sentinels `[TRUE]`, `[FALSE]`, `[NULL]` and `[EMPTY]` map to
    /// native values only when they form the whole string. A string made of
    /// a single `CONF` or `CTXT` tag yields the looked-up value itself when
    /// that value is not a string. Everything else resolves to a string.
    #[must_use]
    pub fn resolve(&self, s: &str) -> Value {
        if let Some(sentinel) = Sentinel::parse(s) {
            return sentinel.value();
        }
        let mut current = s.to_owned();
        for kind in TagKind::ORDER {
            if let Some(native) = self.whole_tag_value(kind, &current) {
                return native;
            }
            current = self.expand(kind, &current);
        }
        Value::String(inline_sentinels(current))
    }

    /// Resolve `s` and render the result as a string.
    #[must_use]
    pub fn resolve_as_string(&self, s: &str) -> String {
        self.resolve(s).to_string()
    }

    fn whole_tag_value(&self, kind: TagKind, s: &str) -> Option<Value> {
        if !matches!(kind, TagKind::Conf | TagKind::Ctxt) {
            return None;
        }
        let content = s.strip_prefix(kind.opening())?.strip_suffix(']')?;
        if content.contains(']') {
            return None;
        }
        match self.lookup(kind, content) {
            Value::String(_) | Value::Null => None,
            native => Some(native),
        }
    }

    fn lookup(&self, kind: TagKind, key: &str) -> Value {
        match kind {
            TagKind::Conf => self.environment.get(key),
            TagKind::Ctxt => self.scenario.get(key),
            TagKind::Sha256 | TagKind::Base64 | TagKind::Now => Value::Null,
        }
    }

    fn expand(&self, kind: TagKind, s: &str) -> String {
        let tags = scan(kind, s);
        if tags.is_empty() {
            return s.to_owned();
        }
        let mut out = s.to_owned();
        for tag in tags {
            let Some(replacement) = self.replacement(kind, &tag) else {
                continue;
            };
            out = out.replace(tag.token, &replacement);
        }
        out
    }

    fn replacement(&self, kind: TagKind, tag: &Tag<'_>) -> Option<String> {
        match kind {
            TagKind::Conf | TagKind::Ctxt => {
                let value = self.lookup(kind, tag.content);
                if value.is_null() {
                    tracing::debug!(tag = tag.token, "unresolved tag expands to <nil>");
                }
                Some(value.to_string())
            }
            TagKind::Sha256 => Some(format!("{:x}", Sha256::digest(tag.content.as_bytes()))),
            TagKind::Base64 => Some(STANDARD.encode(tag.content)),
            TagKind::Now => {
                let rendered = render_now((self.clock)(), tag.content);
                if rendered.is_none() {
                    tracing::warn!(tag = tag.token, "malformed NOW tag left untouched");
                }
                rendered
            }
        }
    }
}

fn inline_sentinels(mut s: String) -> String {
    for (literal, sentinel) in SENTINELS {
        if s.contains(literal) {
            s = s.replace(literal, sentinel.inline());
        }
    }
    s
}

/// Render a `NOW` tag body of the form `<offset>:<format>`.
fn render_now(now: OffsetDateTime, content: &str) -> Option<String> {
    let (offset, format) = content.split_once(':').unwrap_or((content, ""));
    let at = now.checked_add(parse_offset(offset)?)?;
    match format {
        "" | "rfc3339" => at.format(&Rfc3339).ok(),
        "unix" => Some(at.unix_timestamp().to_string()),
        "unixmilli" => {
            let millis = at
                .unix_timestamp()
                .checked_mul(1000)?
                .checked_add(i64::from(at.millisecond()))?;
            Some(millis.to_string())
        }
        _ => None,
    }
}

/// Parse offsets such as `+24h`, `-30m`, `90s`, `1500ms` or `2d`.
fn parse_offset(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(Duration::ZERO);
    }
    let split = raw
        .char_indices()
        .find(|(idx, c)| !(c.is_ascii_digit() || (*idx == 0 && matches!(c, '+' | '-'))))
        .map_or(raw.len(), |(idx, _)| idx);
    let (amount, unit) = raw.split_at(split);
    let amount: i64 = amount.parse().ok()?;
    match unit {
        "ms" => Some(Duration::milliseconds(amount)),
        "s" => Some(Duration::seconds(amount)),
        "m" => Some(Duration::minutes(amount)),
        "h" => Some(Duration::hours(amount)),
        "d" => Some(Duration::days(amount)),
        _ => None,
    }
}
