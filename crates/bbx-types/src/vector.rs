//! Parameter vectors: the current assignment of values to search variables.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::VariableDomain;
use crate::errors::{BbxError, BbxResult};

/// One variable of a vector together with its current value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Slot {
    domain: VariableDomain,
    value: f64,
}

/// A named, insertion-ordered collection of variable values.
///
/// A vector may own nested child vectors. Names are unique across the whole
/// tree, and lookups resolve through children after the vector's own
/// variables. `Clone` is a deep copy: domains, values and children are all
/// duplicated, so a clone never aliases the original.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "VectorSpec")]
pub struct ParameterVector {
    slots: Vec<Slot>,
    #[serde(default)]
    children: Vec<ParameterVector>,
    #[serde(skip)]
    disposed: bool,
}

/// Unchecked wire form of a vector.
#[derive(Debug, Clone, Deserialize)]
struct VectorSpec {
    slots: Vec<Slot>,
    #[serde(default)]
    children: Vec<ParameterVector>,
}

impl TryFrom<VectorSpec> for ParameterVector {
    type Error = BbxError;

    /// Values are restored as stored; only name uniqueness is enforced.
    fn try_from(spec: VectorSpec) -> BbxResult<Self> {
        let mut vector = Self::new();
        for slot in spec.slots {
            if vector.contains(slot.domain.name()) {
                return Err(BbxError::DuplicateVariable {
                    name: slot.domain.name().to_string(),
                });
            }
            vector.slots.push(slot);
        }
        for child in spec.children {
            vector.add_child(child)?;
        }
        Ok(vector)
    }
}

impl ParameterVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a vector with every variable set to its domain minimum.
    pub fn from_domains(domains: impl IntoIterator<Item = VariableDomain>) -> BbxResult<Self> {
        let mut vector = Self::new();
        for domain in domains {
            let min = domain.min();
            vector.add(domain, min)?;
        }
        Ok(vector)
    }

    /// Builder form of [`ParameterVector::add`].
    pub fn with_variable(mut self, domain: VariableDomain, initial: f64) -> BbxResult<Self> {
        self.add(domain, initial)?;
        Ok(self)
    }

    /// Appends a variable. The initial value is clamped into the domain.
    pub fn add(&mut self, domain: VariableDomain, initial: f64) -> BbxResult<()> {
        self.ensure_live()?;
        if self.contains(domain.name()) {
            return Err(BbxError::DuplicateVariable {
                name: domain.name().to_string(),
            });
        }
        let value = domain.clamp(initial);
        self.slots.push(Slot { domain, value });
        Ok(())
    }

    /// Nests `child` under this vector. Its variable names must not clash
    /// with any name already reachable from this vector.
    pub fn add_child(&mut self, child: ParameterVector) -> BbxResult<()> {
        self.ensure_live()?;
        child.ensure_live()?;
        if let Some(name) = child.var_names().into_iter().find(|n| self.contains(n)) {
            return Err(BbxError::DuplicateVariable { name });
        }
        self.children.push(child);
        Ok(())
    }

    pub fn get(&self, name: &str) -> BbxResult<f64> {
        self.ensure_live()?;
        self.slot(name)
            .map(|slot| slot.value)
            .ok_or_else(|| unknown(name))
    }

    /// Stores `value` as given; no clamping or rounding is applied.
    pub fn set(&mut self, name: &str, value: f64) -> BbxResult<()> {
        self.ensure_live()?;
        let slot = self.slot_mut(name).ok_or_else(|| unknown(name))?;
        slot.value = value;
        Ok(())
    }

    pub fn domain(&self, name: &str) -> BbxResult<&VariableDomain> {
        self.ensure_live()?;
        self.slot(name)
            .map(|slot| &slot.domain)
            .ok_or_else(|| unknown(name))
    }

    /// Variable names: own variables in insertion order, then each child's
    /// names depth-first.
    pub fn var_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.len());
        self.collect_names(&mut names);
        names
    }

    /// Ordered `(name, value)` snapshot of the whole tree.
    pub fn values(&self) -> Vec<(String, f64)> {
        let mut values = Vec::with_capacity(self.len());
        self.collect_values(&mut values);
        values
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slot(name).is_some()
    }

    /// Total number of variables, children included.
    pub fn len(&self) -> usize {
        self.slots.len() + self.children.iter().map(ParameterVector::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn set_all_to_min(&mut self) -> BbxResult<()> {
        self.ensure_live()?;
        self.for_each_slot_mut(&mut |slot| slot.value = slot.domain.min());
        Ok(())
    }

    pub fn set_all_to_max(&mut self) -> BbxResult<()> {
        self.ensure_live()?;
        self.for_each_slot_mut(&mut |slot| slot.value = slot.domain.max());
        Ok(())
    }

    /// Releases all variables and children. Subsequent accessors return
    /// [`BbxError::Disposed`]. Calling this more than once is harmless.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        for child in &mut self.children {
            child.dispose();
        }
        self.children.clear();
        self.slots.clear();
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn ensure_live(&self) -> BbxResult<()> {
        if self.disposed {
            Err(BbxError::Disposed)
        } else {
            Ok(())
        }
    }

    fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots
            .iter()
            .find(|slot| slot.domain.name() == name)
            .or_else(|| self.children.iter().find_map(|child| child.slot(name)))
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut Slot> {
        if let Some(index) = self.slots.iter().position(|s| s.domain.name() == name) {
            return Some(&mut self.slots[index]);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.slot_mut(name))
    }

    fn for_each_slot_mut(&mut self, f: &mut dyn FnMut(&mut Slot)) {
        for slot in &mut self.slots {
            f(slot);
        }
        for child in &mut self.children {
            child.for_each_slot_mut(f);
        }
    }

    fn collect_names(&self, out: &mut Vec<String>) {
        out.extend(self.slots.iter().map(|s| s.domain.name().to_string()));
        for child in &self.children {
            child.collect_names(out);
        }
    }

    fn collect_values(&self, out: &mut Vec<(String, f64)>) {
        out.extend(
            self.slots
                .iter()
                .map(|s| (s.domain.name().to_string(), s.value)),
        );
        for child in &self.children {
            child.collect_values(out);
        }
    }
}

fn unknown(name: &str) -> BbxError {
    BbxError::UnknownVariable {
        name: name.to_string(),
    }
}

impl fmt::Display for ParameterVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.disposed {
            return write!(f, "<disposed>");
        }
        write!(f, "{{")?;
        for (i, (name, value)) in self.values().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        write!(f, "}}")
    }
}
