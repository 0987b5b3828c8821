//! # Concurrent Transitions
//!
//! Races transitions on a multi-thread runtime. Every transition must behave
//! as if run alone: duplicate votes never both land and distinct voters never
//! lose a counter update.

#[cfg(test)]
mod tests {
    use crate::fixtures::{create_proposal, identity, key, shared_service};
    use evote_program::prelude::*;
    use futures::future::join_all;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_racing_duplicate_votes_one_wins() {
        let service = shared_service();
        let proposal = create_proposal(&service, "owner", 0, "race").await;

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let service = service.clone();
                let choice = if i % 2 == 0 {
                    VoteChoice::Yes
                } else {
                    VoteChoice::No
                };
                tokio::spawn(async move { service.vote(&key("dup"), proposal, choice).await })
            })
            .collect();

        let results: Vec<_> = join_all(handles)
            .await
            .into_iter()
            .map(|joined| joined.expect("task completed"))
            .collect();

        let wins = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(wins, 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, VotingError::AlreadyVoted { .. })));

        let stored = service.fetch_proposal(proposal).await.unwrap().unwrap();
        assert_eq!(stored.total_votes(), 1);
        assert_eq!(service.votes_for(proposal).await.unwrap().len(), 1);
        assert!(service.audit(proposal).await.unwrap().is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_distinct_voters_lose_no_updates() {
        let service = shared_service();
        let proposal = create_proposal(&service, "owner", 0, "turnout").await;
        let voters = 64;

        let handles: Vec<_> = (0..voters)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move {
                    let voter = key(&format!("voter-{i}"));
                    if i % 3 == 0 {
                        service.vote_no(&voter, proposal).await
                    } else {
                        service.vote_yes(&voter, proposal).await
                    }
                })
            })
            .collect();

        for joined in join_all(handles).await {
            joined.expect("task completed").expect("vote accepted");
        }

        let no = (0..voters).filter(|i| i % 3 == 0).count() as u32;
        let stored = service.fetch_proposal(proposal).await.unwrap().unwrap();
        assert_eq!(stored.tally(), (voters as u32 - no, no));
        assert_eq!(
            service.votes_for(proposal).await.unwrap().len(),
            voters as usize
        );
        assert!(service.audit(proposal).await.unwrap().is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_racing_duplicate_creates_one_wins() {
        let service = shared_service();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .create(&key("author"), 0, format!("attempt {i}"))
                        .await
                })
            })
            .collect();

        let results: Vec<_> = join_all(handles)
            .await
            .into_iter()
            .map(|joined| joined.expect("task completed"))
            .collect();

        let winner = results
            .iter()
            .filter_map(|r| r.as_ref().ok())
            .collect::<Vec<_>>();
        assert_eq!(winner.len(), 1);

        let address = service.proposal_address(&identity("author"), 0).unwrap();
        let stored = service.fetch_proposal(address).await.unwrap().unwrap();
        assert_eq!(&stored, winner[0].proposal());
        assert_eq!(service.all_proposals().await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_event_order_matches_tally_progression() {
        let service = shared_service();
        let proposal = create_proposal(&service, "owner", 0, "ordering").await;

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .vote_yes(&key(&format!("v{i}")), proposal)
                        .await
                })
            })
            .collect();
        for joined in join_all(handles).await {
            joined.expect("task completed").expect("vote accepted");
        }

        let tallies: Vec<u32> = service
            .publisher()
            .by_topic(topics::VOTE_CAST)
            .into_iter()
            .filter_map(|event| match event {
                ProgramEvent::VoteCast { yes_votes, .. } => Some(yes_votes),
                ProgramEvent::ProposalCreated { .. } => None,
            })
            .collect();
        assert_eq!(tallies, (1..=20).collect::<Vec<u32>>());
    }
}
