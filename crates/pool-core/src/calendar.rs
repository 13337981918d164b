//! Fixed-size lookup tables indexed by calendar fields.
//!
//! Occupancy statistics are tabulated per month, per weekday, and per hour of
//! day.  Each table is a plain array with one slot per calendar value, so a
//! lookup is a field extraction plus an index: no string keys survive past
//! loading.
//!
//! | Table             | Slots | Slot of an instant         | Label of slot `i`      |
//! |-------------------|-------|----------------------------|------------------------|
//! | [`MonthTable`]    | 12    | `month0()`                 | `"January"` …          |
//! | [`WeekdayTable`]  | 7     | `num_days_from_monday()`   | `"Monday"` …           |
//! | [`HourTable`]     | 24    | `hour()`                   | `"0"` … `"23"`         |
//!
//! Labels are the keys used by the JSON parameter files.

use chrono::{Datelike, NaiveDateTime, Timelike};

pub const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
];

fn month_slot(t: &NaiveDateTime) -> usize {
    t.month0() as usize
}

fn weekday_slot(t: &NaiveDateTime) -> usize {
    t.weekday().num_days_from_monday() as usize
}

fn hour_slot(t: &NaiveDateTime) -> usize {
    t.hour() as usize
}

fn month_label(slot: usize) -> String {
    MONTH_NAMES[slot].to_owned()
}

fn weekday_label(slot: usize) -> String {
    WEEKDAY_NAMES[slot].to_owned()
}

fn hour_label(slot: usize) -> String {
    slot.to_string()
}

/// Generate a calendar-indexed table type.
macro_rules! calendar_table {
    ($(#[$attr:meta])* $vis:vis struct $name:ident[$len:expr] slot = $slot:path, label = $label:path;) => {
        $(#[$attr])*
        #[derive(Clone, Debug, PartialEq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name<T>([T; $len]);

        impl<T> $name<T> {
            /// Number of slots.
            pub const LEN: usize = $len;

            pub fn new(values: [T; $len]) -> Self {
                Self(values)
            }

            /// Slot that `t` falls into.
            #[inline]
            pub fn slot_of(t: &NaiveDateTime) -> usize {
                $slot(t)
            }

            /// Parameter-file key for `slot`.
            pub fn label(slot: usize) -> String {
                $label(slot)
            }

            /// Value for the calendar slot containing `t`.
            #[inline]
            pub fn at(&self, t: &NaiveDateTime) -> &T {
                &self.0[$slot(t)]
            }

            #[inline]
            pub fn get(&self, slot: usize) -> Option<&T> {
                self.0.get(slot)
            }

            pub fn values(&self) -> &[T] {
                &self.0
            }
        }

        impl<T: Copy + Default> $name<T> {
            /// Every slot set to `value`.
            pub fn filled(value: T) -> Self {
                Self([value; $len])
            }

            /// Fill every slot from `f(label)`, stopping at the first error.
            pub fn try_from_labels<E>(
                mut f: impl FnMut(&str) -> Result<T, E>,
            ) -> Result<Self, E> {
                let mut values = [T::default(); $len];
                for (slot, v) in values.iter_mut().enumerate() {
                    *v = f(&$label(slot))?;
                }
                Ok(Self(values))
            }
        }
    };
}

calendar_table! {
    /// One value per calendar month.
    pub struct MonthTable[12] slot = month_slot, label = month_label;
}

calendar_table! {
    /// One value per weekday, Monday first.
    pub struct WeekdayTable[7] slot = weekday_slot, label = weekday_label;
}

calendar_table! {
    /// One value per hour of day.
    pub struct HourTable[24] slot = hour_slot, label = hour_label;
}
