//! Virtual Network Identifier
//!
//! A VNI designates a unique element of a virtual network. On the wire it
//! occupies the high 24 bits of the second Geneve header word.
//!
//! ```
//! use geneve::{Vni, MAX_VNI};
//!
//! assert!(Vni(100).is_valid());
//! assert!(Vni(MAX_VNI).is_valid());
//! assert!(!Vni(MAX_VNI + 1).is_valid());
//!
//! assert_eq!(Vni::new(0x1000000), None);
//! assert_eq!(Vni::new(42).map(Vni::get), Some(42));
//! ```

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Maximum possible value for a VNI: the maximum value of a 24-bit integer.
pub const MAX_VNI: u32 = (1 << 24) - 1;

/// A 24-bit Virtual Network Identifier.
///
/// The value is held in a `u32` so that out-of-range identifiers can be
/// represented and rejected by the encoder. Use [`Vni::is_valid`] to check it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Vni(pub u32);

impl Vni {
    pub const MAX: Vni = Vni(MAX_VNI);

    /// Checked constructor, returns `None` for values wider than 24 bits.
    #[inline]
    pub fn new(value: u32) -> Option<Self> {
        let vni = Vni(value);
        vni.is_valid().then_some(vni)
    }

    /// Determines if the VNI is a valid, 24-bit integer.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.0 <= MAX_VNI
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for Vni {
    #[inline]
    fn from(value: u32) -> Self {
        Vni(value)
    }
}

impl From<Vni> for u32 {
    #[inline]
    fn from(vni: Vni) -> Self {
        vni.0
    }
}

impl Display for Vni {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
