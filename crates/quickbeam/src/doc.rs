//! Documentation records produced by native functions in introspection mode

use serde::Serialize;
use tracing::warn;

use crate::invoke::{Invocation, NativeFn};

/// Most signatures a record keeps.
pub const MAX_SIGNATURES: usize = 3;

/// One description/signature pair, e.g. `("Sorts a list", "(list):list")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signature {
    /// What this form of the function does
    pub desc: String,
    /// Parameter and return shape
    pub sig: String,
}

/// Passive description of a native function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocRecord {
    /// Name the function registers under
    pub func_name: String,
    /// Free-text notes
    pub notes: String,
    /// One to three signature pairs
    pub signatures: Vec<Signature>,
    #[serde(skip)]
    ok: bool,
}

impl DocRecord {
    /// Start a record for `func_name`.
    pub fn new(func_name: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            func_name: func_name.into(),
            notes: notes.into(),
            signatures: Vec::new(),
            ok: false,
        }
    }

    /// Add a signature pair (builder pattern).
    pub fn signature(mut self, desc: impl Into<String>, sig: impl Into<String>) -> Self {
        if self.signatures.len() >= MAX_SIGNATURES {
            warn!(
                func = %self.func_name,
                "documentation record already has {} signatures, ignoring extra",
                MAX_SIGNATURES
            );
            return self;
        }
        self.signatures.push(Signature {
            desc: desc.into(),
            sig: sig.into(),
        });
        self
    }

    /// Whether introspection populated this record.
    pub fn ok(&self) -> bool {
        self.ok
    }

    pub(crate) fn mark_ok(&mut self) {
        self.ok = true;
    }

    /// Query `f` in introspection mode.
    ///
    /// A record with `ok() == false` means `f` has no introspection support.
    pub fn info(f: NativeFn) -> DocRecord {
        Invocation::introspect(f).unwrap_or_default()
    }
}

/// Answer an introspection query and return early.
///
/// Place at the top of a native function:
///
/// ```
/// use quickbeam::{document, Invocation, Result};
///
/// fn double(cx: &mut Invocation<'_>) -> Result<()> {
///     document!(cx, "double", "", "Doubles a number." => "(number):number");
///     let n = cx.arg(0)?.as_number();
///     cx.result().assign(n * 2.0);
///     Ok(())
/// }
///
/// let doc = quickbeam::DocRecord::info(double);
/// assert!(doc.ok());
/// assert_eq!(doc.func_name, "double");
/// ```
#[macro_export]
macro_rules! document {
    ($cx:expr, $name:expr, $notes:expr, $($desc:expr => $sig:expr),+ $(,)?) => {
        if $cx.doc_mode() {
            $cx.document($crate::DocRecord::new($name, $notes)$(.signature($desc, $sig))+);
            return Ok(());
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    fn documented(cx: &mut Invocation<'_>) -> Result<()> {
        document!(
            cx,
            "documented",
            "has two forms",
            "One argument." => "(any):null",
            "Two arguments." => "(any, any):null",
        );
        cx.arg(0)?;
        Ok(())
    }

    fn undocumented(cx: &mut Invocation<'_>) -> Result<()> {
        cx.result().assign(1.0);
        Ok(())
    }

    #[test]
    fn test_info_populates_record() {
        let doc = DocRecord::info(documented);
        assert!(doc.ok());
        assert_eq!(doc.func_name, "documented");
        assert_eq!(doc.notes, "has two forms");
        assert_eq!(doc.signatures.len(), 2);
        assert_eq!(doc.signatures[1].sig, "(any, any):null");
    }

    #[test]
    fn test_info_without_support() {
        let doc = DocRecord::info(undocumented);
        assert!(!doc.ok());
    }

    #[test]
    fn test_signature_limit() {
        let doc = DocRecord::new("f", "")
            .signature("a", "1")
            .signature("b", "2")
            .signature("c", "3")
            .signature("d", "4");
        assert_eq!(doc.signatures.len(), MAX_SIGNATURES);
    }

    #[test]
    fn test_serialize_skips_validity_flag() {
        let doc = DocRecord::new("f", "notes").signature("d", "s");
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(
            json,
            r#"{"func_name":"f","notes":"notes","signatures":[{"desc":"d","sig":"s"}]}"#
        );
    }
}
