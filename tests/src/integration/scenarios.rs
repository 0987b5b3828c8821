//! # Proposal and Vote Scenarios
//!
//! End-to-end flows through `VotingApi`, checking stored records, the event
//! log and the tally invariant after each step.

#[cfg(test)]
mod tests {
    use crate::fixtures::{create_proposal, identity, key, shared_service, TestService};
    use evote_program::prelude::*;

    async fn tally(service: &TestService, proposal: Address) -> (u32, u32) {
        service
            .fetch_proposal(proposal)
            .await
            .unwrap()
            .unwrap()
            .tally()
    }

    // =============================================================================
    // CREATE
    // =============================================================================

    #[tokio::test]
    async fn test_long_description_rejected_without_record() {
        let service = shared_service();
        let description = "Very large description that will break the program!";
        assert_eq!(description.len(), 53);

        let err = service
            .create(&key("alice"), 0, description.to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, VotingError::DescriptionTooLong { len: 53, .. }));
        assert_eq!(err.number(), 6000);
        let address = service.proposal_address(&identity("alice"), 0).unwrap();
        assert!(service.fetch_proposal(address).await.unwrap().is_none());
        assert!(service.publisher().is_empty());
    }

    #[tokio::test]
    async fn test_description_stored_verbatim() {
        let service = shared_service();
        // Length counts bytes: 16 euro signs are 48 bytes.
        let description = "\u{20AC}".repeat(16);
        let address = create_proposal(&service, "alice", 0, &description).await;

        let stored = service.fetch_proposal(address).await.unwrap().unwrap();
        assert_eq!(stored.description, description);
        assert_eq!(stored.tally(), (0, 0));
        assert!(stored.ongoing);
        assert_eq!(stored.owner, identity("alice"));
    }

    #[tokio::test]
    async fn test_multibyte_description_over_limit() {
        let service = shared_service();
        // 17 characters, 51 bytes.
        let err = service
            .create(&key("alice"), 0, "\u{20AC}".repeat(17))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "DescriptionTooLong");
    }

    #[tokio::test]
    async fn test_independent_proposals() {
        let service = shared_service();
        let a0 = create_proposal(&service, "alice", 0, "first").await;
        let a1 = create_proposal(&service, "alice", 1, "second").await;
        let b0 = create_proposal(&service, "bob", 0, "third").await;

        service.vote_yes(&key("carol"), a0).await.unwrap();

        assert_eq!(
            service.fetch_proposal(a0).await.unwrap().unwrap().tally(),
            (1, 0)
        );
        assert_eq!(
            service.fetch_proposal(a1).await.unwrap().unwrap().tally(),
            (0, 0)
        );
        assert_eq!(
            service.fetch_proposal(b0).await.unwrap().unwrap().tally(),
            (0, 0)
        );

        let all = service.all_proposals().await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[tokio::test]
    async fn test_repeated_pid_leaves_original() {
        let service = shared_service();
        let address = create_proposal(&service, "alice", 4, "original").await;
        service.vote_no(&key("bob"), address).await.unwrap();

        let err = service
            .create(&key("alice"), 4, "replacement".to_string())
            .await
            .unwrap_err();
        assert_eq!(err, VotingError::AddressCollision(address));

        let stored = service.fetch_proposal(address).await.unwrap().unwrap();
        assert_eq!(stored.description, "original");
        assert_eq!(stored.tally(), (0, 1));
    }

    // =============================================================================
    // VOTE
    // =============================================================================

    #[tokio::test]
    async fn test_full_voting_session() {
        let service = shared_service();
        let proposal = create_proposal(&service, "owner", 0, "Proposal #1").await;
        assert_eq!(tally(&service, proposal).await, (0, 0));

        service.vote_yes(&key("a"), proposal).await.unwrap();
        assert_eq!(tally(&service, proposal).await, (1, 0));

        service.vote_no(&key("b"), proposal).await.unwrap();
        assert_eq!(tally(&service, proposal).await, (1, 1));

        service.vote_no(&key("c"), proposal).await.unwrap();
        assert_eq!(tally(&service, proposal).await, (1, 2));

        let err = service.vote_yes(&key("a"), proposal).await.unwrap_err();
        assert_eq!(err.code(), "DuplicatedVoteNotAllowed");
        assert_eq!(tally(&service, proposal).await, (1, 2));

        let votes = service.votes_for(proposal).await.unwrap();
        assert_eq!(votes.len(), 3);
        assert!(service.audit(proposal).await.unwrap().is_ok());

        let log = service.publisher();
        assert_eq!(log.by_topic(topics::PROPOSAL_CREATED).len(), 1);
        assert_eq!(log.by_topic(topics::VOTE_CAST).len(), 3);
    }

    #[tokio::test]
    async fn test_vote_record_contents() {
        let service = shared_service();
        let proposal = create_proposal(&service, "owner", 0, "Proposal #1").await;
        service.vote_no(&key("voter"), proposal).await.unwrap();

        let address = service.vote_address(&proposal, &identity("voter")).unwrap();
        let vote = service.fetch_vote(address).await.unwrap().unwrap();
        assert_eq!(vote.voter, identity("voter"));
        assert_eq!(vote.proposal, proposal);
        assert_eq!(vote.choice, VoteChoice::No);
    }

    #[tokio::test]
    async fn test_owner_may_vote_once() {
        let service = shared_service();
        let proposal = create_proposal(&service, "owner", 0, "self vote").await;
        service.vote_yes(&key("owner"), proposal).await.unwrap();
        assert!(service.vote_no(&key("owner"), proposal).await.is_err());
    }

    #[tokio::test]
    async fn test_one_voter_many_proposals() {
        let service = shared_service();
        let first = create_proposal(&service, "owner", 0, "first").await;
        let second = create_proposal(&service, "owner", 1, "second").await;

        service.vote_yes(&key("voter"), first).await.unwrap();
        service.vote_no(&key("voter"), second).await.unwrap();

        assert_eq!(service.votes_for(first).await.unwrap().len(), 1);
        assert_eq!(service.votes_for(second).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_vote_on_unknown_address() {
        let service = shared_service();
        let nowhere = service.proposal_address(&identity("ghost"), 9).unwrap();

        let err = service.vote_yes(&key("a"), nowhere).await.unwrap_err();
        assert_eq!(err.code(), "AccountNotInitialized");
        assert_eq!(err.number(), 3012);
        assert_eq!(service.store().len().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_closed_proposal_rejects_both_choices() {
        let service = shared_service();
        let address = create_proposal(&service, "owner", 0, "closed").await;

        let mut proposal = service.fetch_proposal(address).await.unwrap().unwrap();
        proposal.close();
        service
            .store()
            .put_raw(address, proposal.encode().unwrap())
            .unwrap();

        for choice in [VoteChoice::Yes, VoteChoice::No] {
            let err = service
                .vote(&key("a"), address, choice)
                .await
                .unwrap_err();
            assert_eq!(err, VotingError::VotingClosed(address));
        }
        assert!(service.votes_for(address).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stats_track_outcomes() {
        let service = shared_service();
        let proposal = create_proposal(&service, "owner", 0, "stats").await;
        service.vote_yes(&key("a"), proposal).await.unwrap();
        let _ = service.vote_yes(&key("a"), proposal).await;
        let _ = service.create(&key("owner"), 1, "x".repeat(60)).await;

        let stats = service.stats().await;
        assert_eq!(stats.proposals_created, 1);
        assert_eq!(stats.votes_cast, 1);
        assert_eq!(stats.rejected_transitions, 2);
    }
}
