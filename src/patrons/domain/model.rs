use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::books::domain::model::BookEntity;
use crate::core::domain::{Configuration, Identifiable};
use crate::core::library::{FinePolicy, LibraryError, LibraryResult};
use crate::patrons::Patron;
use crate::utils::date::{serializer, whole_days_between};

// FineRules holds the grace period and daily rate used to price an overdue loan.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct FineRules {
    pub loan_days: i64,
    pub fine_per_day: f64,
    pub policy: FinePolicy,
}

impl FineRules {
    pub fn new(loan_days: i64, fine_per_day: f64, policy: FinePolicy) -> Self {
        Self { loan_days, fine_per_day, policy }
    }
}

impl From<&Configuration> for FineRules {
    fn from(config: &Configuration) -> Self {
        FineRules::new(config.loan_days, config.fine_per_day, config.fine_policy)
    }
}

// LoanEntity is one copy held by a member since `issued_at`.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct LoanEntity {
    pub book_id: String,
    #[serde(with = "serializer")]
    pub issued_at: NaiveDateTime,
}

impl LoanEntity {
    pub fn new(book_id: &str, issued_at: NaiveDateTime) -> Self {
        Self {
            book_id: book_id.to_string(),
            issued_at,
        }
    }

    pub fn days_overdue(&self, now: NaiveDateTime, rules: &FineRules) -> i64 {
        whole_days_between(self.issued_at, now) - rules.loan_days
    }

    // amount owed for this loan alone, zero while inside the grace period
    pub fn fine(&self, now: NaiveDateTime, rules: &FineRules) -> f64 {
        let days = self.days_overdue(now, rules);
        if days > 0 {
            days as f64 * rules.fine_per_day
        } else {
            0.0
        }
    }
}

// MemberEntity is a registered patron with the loans it currently holds and its fine balance.
// Loans and fines live only in memory; the member dataset stores identity columns.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct MemberEntity {
    pub member_id: i64,
    pub name: String,
    pub membership_type: String,
    pub loans: Vec<LoanEntity>,
    pub fines: f64,
}

impl MemberEntity {
    pub fn new(member_id: i64, name: &str, membership_type: &str) -> Self {
        Self {
            member_id,
            name: name.to_string(),
            membership_type: membership_type.to_string(),
            loans: vec![],
            fines: 0.0,
        }
    }

    // Takes a copy of the book and records the loan. The same title may be held more
    // than once and there is no cap on concurrent loans.
    pub fn issue_book(&mut self, book: &mut BookEntity, now: NaiveDateTime) -> LibraryResult<()> {
        book.take_copy()?;
        self.loans.push(LoanEntity::new(book.book_id.as_str(), now));
        Ok(())
    }

    // Removes the first loan of the book, puts the copy back and returns the fine balance.
    pub fn return_book(&mut self, book: &mut BookEntity, now: NaiveDateTime, rules: &FineRules) -> LibraryResult<f64> {
        let Some(pos) = self.loans.iter().position(|loan| loan.book_id == book.book_id) else {
            return Err(LibraryError::not_found("Book not found."));
        };
        book.put_back_copy()?;
        let loan = self.loans.remove(pos);
        match rules.policy {
            // the returned loan is already gone, so only other copies of the same title are charged
            FinePolicy::Cumulative => Ok(self.calculate_fine(book.book_id.as_str(), now, rules)),
            FinePolicy::OnReturn => {
                self.fines += loan.fine(now, rules);
                Ok(self.fines)
            }
        }
    }

    // Adds the overdue amount of every held loan of the book to the balance and returns the
    // new balance. Calling it again charges the same overdue days again.
    pub fn calculate_fine(&mut self, book_id: &str, now: NaiveDateTime, rules: &FineRules) -> f64 {
        let charge = self.assess_fine(book_id, now, rules);
        self.fines += charge;
        self.fines
    }

    // overdue amount of every held loan of the book, without touching the balance
    pub fn assess_fine(&self, book_id: &str, now: NaiveDateTime, rules: &FineRules) -> f64 {
        self.loans.iter()
            .filter(|loan| loan.book_id == book_id)
            .map(|loan| loan.fine(now, rules))
            .sum()
    }

    // no floor: paying more than is owed leaves a credit
    pub fn pay_fine(&mut self, amount: f64) -> f64 {
        self.fines -= amount;
        self.fines
    }
}

impl Identifiable for MemberEntity {
    fn id(&self) -> String {
        self.member_id.to_string()
    }
}

impl Patron for MemberEntity {
    fn fine_balance(&self) -> f64 {
        self.fines
    }

    fn loan_count(&self) -> usize {
        self.loans.len()
    }
}
