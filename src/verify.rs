use crate::decode::{Fixture, FixtureTable};
use log::*;

/// Independent check of a decoded schedule:
///  - compact: every team plays exactly one game in every round, and its opponent
///    agrees on the pairing and the venue,
///  - double round robin: every ordered pair (home, away) happens in exactly one round,
///  - phased (optional): the two meetings of a pair are in different legs.
pub fn verify_schedule(table: &FixtureTable, phased: bool) -> bool {
    let teams = table.teams();
    let rounds = table.rounds();

    // compact, in every round, teams are matched
    for round in 0..rounds {
        for t1 in 0..teams {
            let fixture = match table.get(t1, round) {
                Some(f) => f,
                None => {
                    warn!("in round r{}, t{} plays no game", round, t1);
                    return false;
                }
            };
            let t2 = fixture.opponent();
            let mirror = match fixture {
                Fixture::Home(_) => Fixture::Away(t1),
                Fixture::Away(_) => Fixture::Home(t1),
            };
            if t2 == t1 || table.get(t2, round) != Some(mirror) {
                warn!("in round r{}, t{} has {} but t{} disagrees", round, t1, fixture, t2);
                return false;
            }
        }
    }

    // 2rr, every (home, away) pair happens in exactly one round
    for t1 in 0..teams {
        for t2 in 0..teams {
            if t1 == t2 {
                continue;
            }
            let home_rounds = (0..rounds)
                .filter(|r| table.get(t1, *r) == Some(Fixture::Home(t2)))
                .collect::<Vec<_>>();
            if home_rounds.len() != 1 {
                warn!("t{} hosts t{} {} times", t1, t2, home_rounds.len());
                return false;
            }

            // home and away matches happen in opposite legs
            if phased && t1 < t2 {
                let away_round = (0..rounds).find(|r| table.get(t1, *r) == Some(Fixture::Away(t2)));
                let leg = |r: usize| r < teams - 1;
                match away_round {
                    Some(away) if leg(away) != leg(home_rounds[0]) => {}
                    _ => {
                        warn!("t{} and t{} meet twice in the same leg", t1, t2);
                        return false;
                    }
                }
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    // 0-1 2-3 | 0-2 1-3 | 0-3 1-2, mirrored in the second leg
    fn four_teams(venues_swapped_in_round: Option<usize>) -> FixtureTable {
        let leg = vec![vec![(0, 1), (2, 3)], vec![(2, 0), (1, 3)], vec![(0, 3), (1, 2)]];
        let mut table = FixtureTable::empty(4).unwrap();
        for (k, games) in leg.iter().enumerate() {
            for (h, a) in games.iter().copied() {
                let (h2, a2) = if venues_swapped_in_round == Some(k) { (h, a) } else { (a, h) };
                table.place(h, k, Fixture::Home(a)).unwrap();
                table.place(a, k, Fixture::Away(h)).unwrap();
                table.place(h2, k + 3, Fixture::Home(a2)).unwrap();
                table.place(a2, k + 3, Fixture::Away(h2)).unwrap();
            }
        }
        table
    }

    #[test]
    fn accepts_mirrored_schedule() {
        let table = four_teams(None);
        assert!(verify_schedule(&table, false));
        assert!(verify_schedule(&table, true));
    }

    #[test]
    fn rejects_same_host_twice() {
        let table = four_teams(Some(1));
        assert!(!verify_schedule(&table, false));
    }

    #[test]
    fn rejects_incomplete() {
        let table = FixtureTable::empty(4).unwrap();
        assert!(!verify_schedule(&table, false));
    }

    #[test]
    fn phased_rejects_both_meetings_in_one_leg() {
        // 0 and 1 meet in rounds 0 and 1, both in the first leg
        let rounds = vec![
            vec![(0, 1), (2, 3)],
            vec![(1, 0), (3, 2)],
            vec![(0, 2), (1, 3)],
            vec![(2, 0), (3, 1)],
            vec![(0, 3), (1, 2)],
            vec![(3, 0), (2, 1)],
        ];
        let mut table = FixtureTable::empty(4).unwrap();
        for (k, games) in rounds.iter().enumerate() {
            for (h, a) in games.iter().copied() {
                table.place(h, k, Fixture::Home(a)).unwrap();
                table.place(a, k, Fixture::Away(h)).unwrap();
            }
        }
        assert!(verify_schedule(&table, false));
        assert!(!verify_schedule(&table, true));
    }
}
