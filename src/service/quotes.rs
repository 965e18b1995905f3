use std::{
    cmp::Ordering as CmpOrdering,
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver},
        Arc,
    },
    thread,
};

use crate::model::{booster::Booster, ids::BoosterId, rank::Rank};

use super::{
    api::{
        client::{ApiClient, ApiRequest, RequestError},
        parsing::pricing::parse_calculated_price,
    },
    data_manager::{DataRetrievalError, DataRetrievalResult},
};

/// Per-candidate result of the quote fan-out. A booster without a price
/// table is a regular state; a failed request is kept apart from it so the
/// two are never conflated in the listing.
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteState {
    Pending,
    Quoted(f64),
    Unconfigured,
    Failed(String),
}

impl QuoteState {
    pub fn price(&self) -> Option<f64> {
        match self {
            QuoteState::Quoted(price) => Some(*price),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Rating,
    CompletionTime,
    WinRate,
    Price,
}

impl SortKey {
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Rating => "rating",
            SortKey::CompletionTime => "completion time",
            SortKey::WinRate => "win rate",
            SortKey::Price => "price",
        }
    }

    pub fn next(&self) -> SortKey {
        match self {
            SortKey::Rating => SortKey::CompletionTime,
            SortKey::CompletionTime => SortKey::WinRate,
            SortKey::WinRate => SortKey::Price,
            SortKey::Price => SortKey::Rating,
        }
    }
}

/// One independent quote request per candidate booster, each reporting
/// into a map keyed by booster id. Dropping the board cancels the group:
/// late results are discarded instead of landing in a dead channel.
pub struct QuoteBoard {
    states: HashMap<BoosterId, QuoteState>,
    rx: Receiver<(BoosterId, DataRetrievalResult<f64>)>,
    cancelled: Arc<AtomicBool>,
}

impl QuoteBoard {
    pub fn spawn(client: Arc<ApiClient>, boosters: &[Booster], from: Rank, to: Rank) -> Self {
        Self::spawn_with(boosters, move |id| {
            let quote_json = client.request(ApiRequest::CalculatePrice {
                booster: id.clone(),
                from,
                to,
            })?;
            Ok(parse_calculated_price(&quote_json)?)
        })
    }

    /// Fan-out over an arbitrary fetch function; one thread per candidate,
    /// no ordering guarantee between completions.
    pub fn spawn_with<F>(boosters: &[Booster], fetch: F) -> Self
    where
        F: Fn(&BoosterId) -> DataRetrievalResult<f64> + Send + Sync + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let fetch = Arc::new(fetch);

        let mut states = HashMap::new();
        for booster in boosters {
            states.insert(booster.id.clone(), QuoteState::Pending);

            let tx = tx.clone();
            let cancelled = Arc::clone(&cancelled);
            let fetch = Arc::clone(&fetch);
            let id = booster.id.clone();

            thread::spawn(move || {
                let result = fetch(&id);
                if cancelled.load(Ordering::Relaxed) {
                    return; // nobody is listening anymore
                }
                let _ = tx.send((id, result));
            });
        }

        Self { states, rx, cancelled }
    }

    /// Drains finished requests into the state map. One failed candidate
    /// never touches its siblings.
    pub fn poll(&mut self) {
        while let Ok((id, result)) = self.rx.try_recv() {
            let state = match result {
                Ok(price) => QuoteState::Quoted(price),
                Err(DataRetrievalError::ClientFailed(RequestError::NotFound)) => QuoteState::Unconfigured,
                Err(err) => QuoteState::Failed(format!("{}", err)),
            };
            self.states.insert(id, state);
        }
    }

    pub fn state(&self, id: &BoosterId) -> &QuoteState {
        self.states.get(id).unwrap_or(&QuoteState::Pending)
    }

    pub fn pending_count(&self) -> usize {
        self.states.values().filter(|s| **s == QuoteState::Pending).count()
    }

    pub fn is_settled(&self) -> bool {
        self.pending_count() == 0
    }
}

impl Drop for QuoteBoard {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

#[derive(Debug, Clone)]
pub struct CandidateQuote {
    pub booster: Booster,
    pub state: QuoteState,
}

/// Sorts a candidate listing by the selected key. Candidates missing the
/// key's value always sink to the worst position, whatever the direction.
pub fn sort_candidates(candidates: &mut [CandidateQuote], key: SortKey) {
    match key {
        SortKey::Rating => candidates.sort_by(|a, b| descending(a.booster.rating, b.booster.rating)),
        SortKey::WinRate => candidates.sort_by(|a, b| descending(a.booster.win_rate, b.booster.win_rate)),
        SortKey::CompletionTime => candidates.sort_by(|a, b| {
            ascending(a.booster.avg_completion_hours, b.booster.avg_completion_hours)
        }),
        SortKey::Price => candidates.sort_by(|a, b| ascending(a.state.price(), b.state.price())),
    }
}

fn descending(a: Option<f64>, b: Option<f64>) -> CmpOrdering {
    let a = a.unwrap_or(f64::NEG_INFINITY);
    let b = b.unwrap_or(f64::NEG_INFINITY);
    b.total_cmp(&a)
}

fn ascending(a: Option<f64>, b: Option<f64>) -> CmpOrdering {
    let a = a.unwrap_or(f64::INFINITY);
    let b = b.unwrap_or(f64::INFINITY);
    a.total_cmp(&b)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    fn booster(id: u64, rating: Option<f64>, hours: Option<f64>) -> Booster {
        Booster {
            id: id.into(),
            display_name: format!("booster-{}", id),
            rating,
            win_rate: rating.map(|r| r / 10.0),
            avg_completion_hours: hours,
            completed_orders: 5,
            available: true,
            languages: Vec::new(),
        }
    }

    fn settle(board: &mut QuoteBoard) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !board.is_settled() {
            assert!(Instant::now() < deadline, "quote board never settled");
            board.poll();
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn one_failing_candidate_does_not_block_the_others() {
        let boosters: Vec<_> = (1..=4u64).map(|id| booster(id, Some(4.0), None)).collect();
        let mut board = QuoteBoard::spawn_with(&boosters, |id| {
            if id == &BoosterId::from(3u64) {
                Err(DataRetrievalError::ClientFailed(RequestError::NotLoggedIn))
            } else {
                Ok(25.0)
            }
        });

        settle(&mut board);

        assert_eq!(board.state(&1u64.into()), &QuoteState::Quoted(25.0));
        assert_eq!(board.state(&2u64.into()), &QuoteState::Quoted(25.0));
        assert!(matches!(board.state(&3u64.into()), QuoteState::Failed(_)));
        assert_eq!(board.state(&4u64.into()), &QuoteState::Quoted(25.0));
    }

    #[test]
    fn missing_price_table_maps_to_unconfigured() {
        let boosters = vec![booster(1, None, None)];
        let mut board = QuoteBoard::spawn_with(&boosters, |_| {
            Err(DataRetrievalError::ClientFailed(RequestError::NotFound))
        });

        settle(&mut board);
        assert_eq!(board.state(&1u64.into()), &QuoteState::Unconfigured);
    }

    #[test]
    fn slow_out_of_order_completions_all_land() {
        let boosters: Vec<_> = (1..=3u64).map(|id| booster(id, None, None)).collect();
        let mut board = QuoteBoard::spawn_with(&boosters, |id| {
            // Later candidates answer first.
            let millis = 40 / id.0.parse::<u64>().unwrap();
            thread::sleep(Duration::from_millis(millis));
            Ok(id.0.parse::<u64>().unwrap() as f64)
        });

        settle(&mut board);
        for id in 1..=3u64 {
            assert_eq!(board.state(&id.into()), &QuoteState::Quoted(id as f64));
        }
    }

    #[test]
    fn sorting_sinks_missing_values_to_the_bottom() {
        let quoted = |b: Booster, price: Option<f64>| CandidateQuote {
            booster: b,
            state: match price {
                Some(p) => QuoteState::Quoted(p),
                None => QuoteState::Unconfigured,
            },
        };

        let mut candidates = vec![
            quoted(booster(1, None, Some(24.0)), Some(30.0)),
            quoted(booster(2, Some(4.8), None), None),
            quoted(booster(3, Some(3.9), Some(10.0)), Some(20.0)),
        ];

        sort_candidates(&mut candidates, SortKey::Rating);
        assert_eq!(candidates.last().unwrap().booster.id, 1u64.into());

        sort_candidates(&mut candidates, SortKey::CompletionTime);
        assert_eq!(candidates[0].booster.id, 3u64.into());
        assert_eq!(candidates.last().unwrap().booster.id, 2u64.into());

        sort_candidates(&mut candidates, SortKey::Price);
        assert_eq!(candidates[0].booster.id, 3u64.into());
        assert_eq!(candidates.last().unwrap().booster.id, 2u64.into());
    }

    #[test]
    fn cancelled_board_discards_late_results() {
        let boosters = vec![booster(1, None, None)];
        let board = QuoteBoard::spawn_with(&boosters, |_| {
            thread::sleep(Duration::from_millis(50));
            Ok(10.0)
        });
        drop(board);
        // Nothing to assert through the dropped board; the worker exits
        // without sending. This mostly documents the contract.
        thread::sleep(Duration::from_millis(80));
    }
}
