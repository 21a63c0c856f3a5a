//! The journal balancer: two ordered passes that balance every transaction, resolve balance
//! assignments against a running-balance table, and verify balance assertions along the way.

use std::collections::HashMap;

use chrono::NaiveDate;
use ledger_core::{InternedStr, Journal, MixedAmount, Transaction};

use crate::assertion::check_assertion;
use crate::balance_transaction::balance_transaction_with_inferred;
use crate::error::BalanceError;
use crate::opts::BalancingOpts;

/// An entry in the date-sorted pass-2 stream: either a posting from an already-balanced
/// transaction, or a whole transaction still pending assignment resolution.
enum Item {
    Posting {
        txn_slot: usize,
        posting_idx: usize,
        date: NaiveDate,
    },
    Transaction {
        txn_slot: usize,
        date: NaiveDate,
    },
}

impl Item {
    fn date(&self) -> NaiveDate {
        match self {
            Item::Posting { date, .. } | Item::Transaction { date, .. } => *date,
        }
    }
}

/// Balances every transaction in `journal`, executes balance assignments against a running
/// per-account balance table in date order, and verifies balance assertions as it goes.
///
/// The external interface of §6: the full pipeline over a whole journal, as opposed to
/// [`crate::balance_transaction::balance_transaction`] which balances one transaction with no
/// assignment support.
pub fn balance_journal(opts: &BalancingOpts, journal: Journal) -> Result<Journal, BalanceError> {
    let mut effective_opts = opts.clone();
    if effective_opts.commodity_styles.is_none() {
        effective_opts.commodity_styles = Some(journal.infer_commodity_styles());
    }

    let unassignable = journal.unassignable_accounts.clone();

    let mut txn_slots: Vec<Option<Transaction>> = journal
        .transactions
        .into_iter()
        .enumerate()
        .map(|(i, t)| Some(t.with_index((i + 1) as u64)))
        .collect();

    let mut bals: HashMap<InternedStr, MixedAmount> = HashMap::new();
    let mut items: Vec<Item> = Vec::with_capacity(txn_slots.len());

    // Pass 1: balance everything without an assignment posting now, in input order; defer
    // assignment-bearing transactions whole until the running balance exists to resolve them.
    for slot in 0..txn_slots.len() {
        let txn = txn_slots[slot].take().expect("slot populated by construction above");
        if txn.has_assignment() {
            let date = txn.effective_date();
            txn_slots[slot] = Some(txn);
            items.push(Item::Transaction { txn_slot: slot, date });
        } else {
            let (balanced, _inferred) = balance_transaction_with_inferred(&effective_opts, txn)?;
            for (posting_idx, posting) in balanced.postings.iter().enumerate() {
                let date = posting.posting_date.unwrap_or(balanced.date);
                items.push(Item::Posting { txn_slot: slot, posting_idx, date });
            }
            txn_slots[slot] = Some(balanced);
        }
    }

    // Pass 2: stable sort by effective date (ties keep their pass-1 relative order), then walk
    // in date order maintaining the running balance and resolving assignments/assertions.
    items.sort_by_key(Item::date);

    for item in items {
        match item {
            Item::Posting { txn_slot, posting_idx, date } => {
                process_posting_item(&effective_opts, &mut bals, &mut txn_slots, txn_slot, posting_idx, date)?;
            }
            Item::Transaction { txn_slot, .. } => {
                process_transaction_item(&effective_opts, &unassignable, &mut bals, &mut txn_slots, txn_slot)?;
            }
        }
    }

    let transactions = txn_slots
        .into_iter()
        .map(|slot| slot.expect("every slot is repopulated before pass 2 completes"))
        .collect();

    Ok(Journal {
        transactions,
        commodity_styles: effective_opts.styles(),
        unassignable_accounts: unassignable,
    })
}

fn process_posting_item(
    opts: &BalancingOpts,
    bals: &mut HashMap<InternedStr, MixedAmount>,
    txn_slots: &mut [Option<Transaction>],
    txn_slot: usize,
    posting_idx: usize,
    date: NaiveDate,
) -> Result<(), BalanceError> {
    let txn = txn_slots[txn_slot].as_ref().expect("slot holds the balanced transaction");
    let posting = &txn.postings[posting_idx];
    let account = posting.account.clone();
    let stripped = posting
        .amount
        .as_ref()
        .map_or_else(MixedAmount::empty, MixedAmount::strip_prices);

    let new_balance = bals
        .get(&account)
        .cloned()
        .unwrap_or_else(MixedAmount::empty)
        .add(&stripped)
        .normalized();
    bals.insert(account.clone(), new_balance);

    if !opts.ignore_assertions {
        if let Some(assertion) = posting.assertion.clone() {
            check_assertion(&account, &assertion, bals, date, txn.render())?;
        }
    }
    Ok(())
}

fn process_transaction_item(
    opts: &BalancingOpts,
    unassignable: &std::collections::HashSet<InternedStr>,
    bals: &mut HashMap<InternedStr, MixedAmount>,
    txn_slots: &mut [Option<Transaction>],
    txn_slot: usize,
) -> Result<(), BalanceError> {
    let mut txn = txn_slots[txn_slot].take().expect("transaction item slot is populated");

    for posting_idx in 0..txn.postings.len() {
        let is_assignment = txn.postings[posting_idx].is_assignment();
        let account = txn.postings[posting_idx].account.clone();

        if is_assignment {
            if txn.postings[posting_idx].posting_date.is_some() {
                return Err(BalanceError::AssignmentWithPostingDate {
                    pos: txn.postings[posting_idx]
                        .assertion
                        .as_ref()
                        .map(|a| a.pos.clone())
                        .unwrap_or_else(|| txn.pos.clone()),
                    rendered: txn.render(),
                });
            }
            if unassignable.contains(&account) {
                return Err(BalanceError::AssignmentOnUnassignableAccount {
                    account: account.to_string(),
                    rendered: txn.render(),
                });
            }
        }

        let date = txn.postings[posting_idx].posting_date.unwrap_or(txn.date);

        if let Some(amount) = txn.postings[posting_idx].amount.clone() {
            // Explicit amount present (possibly alongside an assertion, e.g. `(a) 1 = 2`):
            // fold it into the running balance as-is and check the assertion against the result.
            let stripped = amount.strip_prices();
            let new_balance = bals
                .get(&account)
                .cloned()
                .unwrap_or_else(MixedAmount::empty)
                .add(&stripped)
                .normalized();
            bals.insert(account.clone(), new_balance);

            if !opts.ignore_assertions {
                if let Some(assertion) = txn.postings[posting_idx].assertion.clone() {
                    check_assertion(&account, &assertion, bals, date, txn.render())?;
                }
            }
        } else if let Some(assertion) = txn.postings[posting_idx].assertion.clone() {
            // True assignment: no amount written at all, only the assertion stating the target
            // balance. Derive the delta from the running balance and assign it to the posting.
            let old_exclusive = bals.get(&account).cloned().unwrap_or_else(MixedAmount::empty);

            let target = if assertion.total {
                MixedAmount::single(assertion.amount.clone())
            } else {
                let other_commodities =
                    old_exclusive.filter(|a| a.commodity != assertion.amount.commodity);
                other_commodities.add(&MixedAmount::single(assertion.amount.clone()))
            };

            let old_reference = if assertion.inclusive {
                Journal::subaccount_prefix_matches(account.as_str(), bals.keys())
                    .into_iter()
                    .fold(MixedAmount::empty(), |acc, acct| {
                        acc.add(bals.get(acct).expect("key came from bals"))
                    })
            } else {
                old_exclusive.clone()
            };

            let delta = target.sub(&old_reference).normalized();
            let new_exclusive = old_exclusive.add(&delta).normalized();
            bals.insert(account.clone(), new_exclusive);

            let filtered_delta = delta.filter(|a| !a.quantity.is_zero());
            txn.postings[posting_idx] = txn.postings[posting_idx].shadow_original();
            txn.postings[posting_idx].amount = Some(filtered_delta);

            if !opts.ignore_assertions {
                check_assertion(&account, &assertion, bals, date, txn.render())?;
            }
        }
        // Else: amount missing, no assertion — left alone; the balancer below fills it in if
        // it is the one allowed missing posting for its class, or rejects the transaction.
    }

    let (balanced, inferred) = balance_transaction_with_inferred(opts, txn)?;
    for (account, amount) in inferred {
        let new_balance = bals
            .get(&account)
            .cloned()
            .unwrap_or_else(MixedAmount::empty)
            .add(&amount.strip_prices())
            .normalized();
        bals.insert(account, new_balance);
    }
    txn_slots[txn_slot] = Some(balanced);
    Ok(())
}
