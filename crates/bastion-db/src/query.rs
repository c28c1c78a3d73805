//! Filtered, sorted, paginated reads keyed by settlement and date range.

use bastion_common::entities::{
    Certification, Incident, Inspection, SecurityComponent, Settlement, Soldier, TrainingEvent,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DbError, Result};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Newest first; undated rows last
    #[default]
    Descending,
    /// Oldest first; undated rows last
    Ascending,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RecordQuery {
    pub settlement_id: Option<Uuid>,
    /// Inclusive lower date bound
    pub from: Option<NaiveDate>,
    /// Inclusive upper date bound
    pub to: Option<NaiveDate>,
    pub order: SortOrder,
    pub page: Option<Page>,
}

impl RecordQuery {
    pub fn for_settlement(settlement_id: Uuid) -> Self {
        Self {
            settlement_id: Some(settlement_id),
            ..Default::default()
        }
    }

    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn until(mut self, to: NaiveDate) -> Self {
        self.to = Some(to);
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn page(mut self, offset: usize, limit: usize) -> Self {
        self.page = Some(Page { offset, limit });
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(DbError::InvalidQuery(format!("date range {from}..{to} is empty")));
            }
        }
        if let Some(page) = self.page {
            if page.limit == 0 {
                return Err(DbError::InvalidQuery("page limit must be positive".to_string()));
            }
        }
        Ok(())
    }

    fn has_date_bound(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    fn matches<T: Dated>(&self, row: &T) -> bool {
        if let Some(id) = self.settlement_id {
            if row.settlement_id() != id {
                return false;
            }
        }
        if !self.has_date_bound() {
            return true;
        }
        // Undated rows cannot satisfy a date bound.
        let Some(date) = row.record_date() else {
            return false;
        };
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }

    /// Run this query over an in-memory table.
    pub fn apply<T: Dated + Clone>(&self, rows: &[T]) -> Result<Vec<T>> {
        self.validate()?;

        let mut out: Vec<T> = rows.iter().filter(|r| self.matches(*r)).cloned().collect();

        // Stable sort keeps insertion order among equal dates.
        out.sort_by(|a, b| match (a.record_date(), b.record_date()) {
            (Some(x), Some(y)) => match self.order {
                SortOrder::Ascending => x.cmp(&y),
                SortOrder::Descending => y.cmp(&x),
            },
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });

        if let Some(page) = self.page {
            out = out.into_iter().skip(page.offset).take(page.limit).collect();
        }
        Ok(out)
    }
}

/// A row that belongs to a settlement and carries a sortable date.
pub trait Dated {
    fn settlement_id(&self) -> Uuid;
    fn record_date(&self) -> Option<NaiveDate>;
}

impl Dated for Settlement {
    fn settlement_id(&self) -> Uuid { self.id }
    fn record_date(&self) -> Option<NaiveDate> { None }
}

impl Dated for Soldier {
    fn settlement_id(&self) -> Uuid { self.settlement_id }
    fn record_date(&self) -> Option<NaiveDate> { self.last_range_date }
}

impl Dated for Certification {
    fn settlement_id(&self) -> Uuid { self.settlement_id }
    fn record_date(&self) -> Option<NaiveDate> { self.issued_on }
}

impl Dated for SecurityComponent {
    fn settlement_id(&self) -> Uuid { self.settlement_id }
    fn record_date(&self) -> Option<NaiveDate> { self.updated_on }
}

impl Dated for Inspection {
    fn settlement_id(&self) -> Uuid { self.settlement_id }
    fn record_date(&self) -> Option<NaiveDate> { Some(self.inspected_on) }
}

impl Dated for Incident {
    fn settlement_id(&self) -> Uuid { self.settlement_id }
    fn record_date(&self) -> Option<NaiveDate> { Some(self.reported_on) }
}

impl Dated for TrainingEvent {
    fn settlement_id(&self) -> Uuid { self.settlement_id }
    fn record_date(&self) -> Option<NaiveDate> { self.held_on }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastion_common::entities::TrainingKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(settlement_id: Uuid, held_on: Option<NaiveDate>) -> TrainingEvent {
        TrainingEvent {
            id: Uuid::new_v4(),
            settlement_id,
            kind: TrainingKind::Drill,
            held_on,
            participants: 12,
        }
    }

    #[test]
    fn test_filters_by_settlement_and_range() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let rows = vec![
            event(a, Some(date(2026, 1, 5))),
            event(a, Some(date(2026, 2, 5))),
            event(b, Some(date(2026, 2, 6))),
            event(a, None),
        ];
        let q = RecordQuery::for_settlement(a).between(date(2026, 2, 1), date(2026, 2, 28));
        let out = q.apply(&rows).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].held_on, Some(date(2026, 2, 5)));
    }

    #[test]
    fn test_sort_descending_undated_last() {
        let a = Uuid::new_v4();
        let rows = vec![
            event(a, None),
            event(a, Some(date(2026, 1, 5))),
            event(a, Some(date(2026, 3, 5))),
        ];
        let out = RecordQuery::for_settlement(a).apply(&rows).unwrap();
        assert_eq!(out[0].held_on, Some(date(2026, 3, 5)));
        assert_eq!(out[1].held_on, Some(date(2026, 1, 5)));
        assert_eq!(out[2].held_on, None);
    }

    #[test]
    fn test_pagination() {
        let a = Uuid::new_v4();
        let rows: Vec<_> = (1..=5).map(|d| event(a, Some(date(2026, 1, d)))).collect();
        let out = RecordQuery::for_settlement(a)
            .order(SortOrder::Ascending)
            .page(1, 2)
            .apply(&rows)
            .unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].held_on, Some(date(2026, 1, 2)));
        assert_eq!(out[1].held_on, Some(date(2026, 1, 3)));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let q = RecordQuery::default().between(date(2026, 3, 1), date(2026, 2, 1));
        assert!(matches!(q.validate(), Err(DbError::InvalidQuery(_))));
    }
}
