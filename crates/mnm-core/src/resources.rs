//! Resource kinds, the seven-slot resource vector and the affordability oracle.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Index, IndexMut, Sub, SubAssign};

/// Number of resource kinds tracked by the economy.
pub const RESOURCE_COUNT: usize = 7;

/// The seven resources of the economy. Gold is the main currency, the rest
/// are secondary resources.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Resource {
    Gold,
    Food,
    Metal,
    Mana,
    Oil,
    Crystal,
    Subdolak,
}

impl Resource {
    /// All resources in vector order.
    pub const ALL: [Resource; RESOURCE_COUNT] = [
        Resource::Gold,
        Resource::Food,
        Resource::Metal,
        Resource::Mana,
        Resource::Oil,
        Resource::Crystal,
        Resource::Subdolak,
    ];

    /// Position of this resource inside a [`ResourceVector`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`Resource::index`]; `None` past the last resource.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Display name, also used by `Display`.
    pub fn name(self) -> &'static str {
        match self {
            Resource::Gold => "Gold",
            Resource::Food => "Food",
            Resource::Metal => "Metal",
            Resource::Mana => "Mana",
            Resource::Oil => "Oil",
            Resource::Crystal => "Crystal",
            Resource::Subdolak => "Subdolak",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed-size vector with one exact decimal quantity per [`Resource`].
///
/// Used for banks, incomes and costs alike. Arithmetic is component-wise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceVector(pub [Decimal; RESOURCE_COUNT]);

impl ResourceVector {
    pub const ZERO: ResourceVector = ResourceVector([Decimal::ZERO; RESOURCE_COUNT]);

    /// Build a vector from whole amounts, in [`Resource::ALL`] order.
    pub fn from_units(units: [i64; RESOURCE_COUNT]) -> Self {
        let mut out = Self::ZERO;
        for (slot, v) in out.0.iter_mut().zip(units) {
            *slot = Decimal::from(v);
        }
        out
    }

    /// A vector with `amount` of a single resource and zero elsewhere.
    pub fn single(resource: Resource, amount: Decimal) -> Self {
        let mut out = Self::ZERO;
        out[resource] = amount;
        out
    }

    pub fn gold(amount: Decimal) -> Self {
        Self::single(Resource::Gold, amount)
    }

    pub fn get(&self, resource: Resource) -> Decimal {
        self.0[resource.index()]
    }

    /// Sum of all components.
    pub fn total(&self) -> Decimal {
        self.0.iter().copied().sum()
    }

    /// True when no component is negative.
    pub fn is_nonnegative(&self) -> bool {
        self.0.iter().all(|v| *v >= Decimal::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Resource, Decimal)> + '_ {
        Resource::ALL.into_iter().map(move |r| (r, self.get(r)))
    }

    /// Lossy conversion for observation vectors.
    pub fn to_f64_array(&self) -> [f64; RESOURCE_COUNT] {
        let mut out = [0.0; RESOURCE_COUNT];
        for (slot, v) in out.iter_mut().zip(self.0.iter()) {
            *slot = v.to_f64().unwrap_or_default();
        }
        out
    }
}

impl Index<Resource> for ResourceVector {
    type Output = Decimal;

    fn index(&self, resource: Resource) -> &Decimal {
        &self.0[resource.index()]
    }
}

impl IndexMut<Resource> for ResourceVector {
    fn index_mut(&mut self, resource: Resource) -> &mut Decimal {
        &mut self.0[resource.index()]
    }
}

impl Add for ResourceVector {
    type Output = ResourceVector;

    fn add(mut self, rhs: ResourceVector) -> ResourceVector {
        self += rhs;
        self
    }
}

impl AddAssign for ResourceVector {
    fn add_assign(&mut self, rhs: ResourceVector) {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a += b;
        }
    }
}

impl Sub for ResourceVector {
    type Output = ResourceVector;

    fn sub(mut self, rhs: ResourceVector) -> ResourceVector {
        self -= rhs;
        self
    }
}

impl SubAssign for ResourceVector {
    fn sub_assign(&mut self, rhs: ResourceVector) {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a -= b;
        }
    }
}

impl fmt::Display for ResourceVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", v.normalize())?;
        }
        f.write_str("]")
    }
}

/// True iff paying `cost` out of `bank` leaves every component non-negative.
pub fn affordable(bank: &ResourceVector, cost: &ResourceVector) -> bool {
    (*bank - *cost).is_nonnegative()
}

/// Batched [`affordable`]: one flag per cost row, all checked against the same bank.
pub fn affordable_mask(bank: &ResourceVector, costs: &[ResourceVector]) -> Vec<bool> {
    costs.iter().map(|cost| affordable(bank, cost)).collect()
}
