use serde::{Deserialize, Serialize};

/// Fixed set of Sri Lankan rupee coins and notes the counter knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Denomination {
    #[serde(rename = "LKR1")]
    Lkr1,
    #[serde(rename = "LKR2")]
    Lkr2,
    #[serde(rename = "LKR5")]
    Lkr5,
    #[serde(rename = "LKR10")]
    Lkr10,
    #[serde(rename = "LKR20")]
    Lkr20,
    #[serde(rename = "LKR50")]
    Lkr50,
    #[serde(rename = "LKR100")]
    Lkr100,
    #[serde(rename = "LKR500")]
    Lkr500,
    #[serde(rename = "LKR1000")]
    Lkr1000,
    #[serde(rename = "LKR5000")]
    Lkr5000,
}

impl Denomination {
    pub const ALL: [Denomination; 10] = [
        Denomination::Lkr1,
        Denomination::Lkr2,
        Denomination::Lkr5,
        Denomination::Lkr10,
        Denomination::Lkr20,
        Denomination::Lkr50,
        Denomination::Lkr100,
        Denomination::Lkr500,
        Denomination::Lkr1000,
        Denomination::Lkr5000,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Denomination::Lkr1 => "LKR1",
            Denomination::Lkr2 => "LKR2",
            Denomination::Lkr5 => "LKR5",
            Denomination::Lkr10 => "LKR10",
            Denomination::Lkr20 => "LKR20",
            Denomination::Lkr50 => "LKR50",
            Denomination::Lkr100 => "LKR100",
            Denomination::Lkr500 => "LKR500",
            Denomination::Lkr1000 => "LKR1000",
            Denomination::Lkr5000 => "LKR5000",
        }
    }

    pub fn face_value(self) -> i64 {
        match self {
            Denomination::Lkr1 => 1,
            Denomination::Lkr2 => 2,
            Denomination::Lkr5 => 5,
            Denomination::Lkr10 => 10,
            Denomination::Lkr20 => 20,
            Denomination::Lkr50 => 50,
            Denomination::Lkr100 => 100,
            Denomination::Lkr500 => 500,
            Denomination::Lkr1000 => 1000,
            Denomination::Lkr5000 => 5000,
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.label() == label)
    }
}

/// Face value of a label; unknown labels are worth nothing.
pub fn face_value_of(label: &str) -> i64 {
    Denomination::from_label(label).map_or(0, Denomination::face_value)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountTotals {
    pub total_value: i64,
    pub total_count: i64,
}

/// Sum value and quantity over a submission.
///
/// Unknown labels still add to `total_count`. Quantities are taken as given,
/// negatives included.
pub fn tally<'a, I>(counts: I) -> CountTotals
where
    I: IntoIterator<Item = (&'a String, &'a i64)>,
{
    counts
        .into_iter()
        .fold(CountTotals::default(), |acc, (label, &qty)| CountTotals {
            total_value: acc
                .total_value
                .saturating_add(face_value_of(label).saturating_mul(qty)),
            total_count: acc.total_count.saturating_add(qty),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Counts;

    fn counts(entries: &[(&str, i64)]) -> Counts {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn labels_round_trip() {
        for d in Denomination::ALL {
            assert_eq!(Denomination::from_label(d.label()), Some(d));
        }
        assert_eq!(Denomination::from_label("lkr100"), None);
    }

    #[test]
    fn notes_and_coins() {
        let totals = tally(&counts(&[("LKR100", 2), ("LKR5000", 1)]));
        assert_eq!(totals.total_value, 5200);
        assert_eq!(totals.total_count, 3);
    }

    #[test]
    fn unknown_label_counts_but_is_worthless() {
        let totals = tally(&counts(&[("USD20", 4), ("LKR10", 3)]));
        assert_eq!(totals.total_value, 30);
        assert_eq!(totals.total_count, 7);
    }

    #[test]
    fn empty_submission() {
        assert_eq!(tally(&Counts::new()), CountTotals::default());
    }

    #[test]
    fn every_denomination_once() {
        let all: Counts = Denomination::ALL
            .iter()
            .map(|d| (d.label().to_string(), 1))
            .collect();
        let totals = tally(&all);
        assert_eq!(totals.total_value, 6688);
        assert_eq!(totals.total_count, 10);
    }

    #[test]
    fn negative_quantities_are_kept() {
        let totals = tally(&counts(&[("LKR50", -2)]));
        assert_eq!(totals.total_value, -100);
        assert_eq!(totals.total_count, -2);
    }
}
