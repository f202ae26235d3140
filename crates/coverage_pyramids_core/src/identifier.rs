use core::borrow::Borrow;
use core::hash::{Hash, Hasher};
use core::ops::Deref;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An opaque string identifier for a resource, pyramid or mosaic.
///
/// Equality and hashing ignore case, one character at a time, so `"Level-0"` and `"level-0"` name the same thing, and so do
/// `"Élévation"` and `"ÉLÉVATION"`. The spelling it was created with is kept for display.
///
/// ```
/// use coverage_pyramids_core::Identifier;
///
/// assert_eq!(Identifier::from("Elevation"), Identifier::from("ELEVATION"));
/// assert_eq!(Identifier::from("Elevation").to_string(), "Elevation");
/// ```
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Identifier(String);

/// The borrowed form of an `Identifier`, with the same case-insensitive equality and hashing.
///
/// Containers keyed by `Identifier` can be searched with an `&IdStr`, so a lookup by `&str` never allocates.
///
/// ```
/// use coverage_pyramids_core::{IdStr, Identifier};
/// use std::collections::HashSet;
///
/// let mut names = HashSet::new();
/// names.insert(Identifier::from("Landsat"));
///
/// assert!(names.contains(IdStr::new("LANDSAT")));
/// ```
#[repr(transparent)]
pub struct IdStr(str);

/// Folds one character to upper case, then to lower case. A case mapping that is not a single character is not applied.
#[inline]
fn fold_case(c: char) -> char {
    let upper = single(c.to_uppercase()).unwrap_or(c);

    single(upper.to_lowercase()).unwrap_or(upper)
}

#[inline]
fn single(mut chars: impl Iterator<Item = char>) -> Option<char> {
    let c = chars.next()?;

    chars.next().is_none().then(|| c)
}

impl IdStr {
    #[inline]
    pub fn new(s: &str) -> &Self {
        // SAFETY: `IdStr` is a `repr(transparent)` wrapper of `str`.
        unsafe { &*(s as *const str as *const IdStr) }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against a plain string.
    #[inline]
    pub fn matches(&self, other: &str) -> bool {
        self.0.chars().map(fold_case).eq(other.chars().map(fold_case))
    }
}

impl PartialEq for IdStr {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.0)
    }
}

impl Eq for IdStr {}

impl Hash for IdStr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Must agree with `eq`.
        for c in self.0.chars() {
            state.write_u32(fold_case(c) as u32);
        }
        state.write_u8(0xff);
    }
}

impl fmt::Debug for IdStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for IdStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl ToOwned for IdStr {
    type Owned = Identifier;

    #[inline]
    fn to_owned(&self) -> Identifier {
        Identifier::new(&self.0)
    }
}

impl Identifier {
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn as_id_str(&self) -> &IdStr {
        IdStr::new(&self.0)
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for Identifier {
    type Target = IdStr;

    #[inline]
    fn deref(&self) -> &IdStr {
        self.as_id_str()
    }
}

impl Borrow<IdStr> for Identifier {
    #[inline]
    fn borrow(&self) -> &IdStr {
        self.as_id_str()
    }
}

impl PartialEq for Identifier {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.as_id_str() == other.as_id_str()
    }
}

impl Eq for Identifier {}

impl PartialEq<str> for Identifier {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.matches(other)
    }
}

impl PartialEq<&str> for Identifier {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.matches(other)
    }
}

impl Hash for Identifier {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_id_str().hash(state)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<IdStr> for IdStr {
    #[inline]
    fn as_ref(&self) -> &IdStr {
        self
    }
}

impl AsRef<IdStr> for Identifier {
    #[inline]
    fn as_ref(&self) -> &IdStr {
        self.as_id_str()
    }
}

impl AsRef<IdStr> for str {
    #[inline]
    fn as_ref(&self) -> &IdStr {
        IdStr::new(self)
    }
}

impl AsRef<IdStr> for String {
    #[inline]
    fn as_ref(&self) -> &IdStr {
        IdStr::new(self)
    }
}

impl From<&str> for Identifier {
    #[inline]
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Identifier {
    #[inline]
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&IdStr> for Identifier {
    #[inline]
    fn from(id: &IdStr) -> Self {
        id.to_owned()
    }
}
