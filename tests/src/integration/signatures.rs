//! # Signed Transaction Authorization
//!
//! The authorizing identity of a transition is always the verified signer.
//! A signature binds the instruction and the program id.

#[cfg(test)]
mod tests {
    use crate::fixtures::{identity, key, shared_service, signed};
    use ed25519_dalek::SigningKey;
    use evote_program::prelude::*;
    use rand::rngs::OsRng;

    #[tokio::test]
    async fn test_signed_session() {
        let service = shared_service();

        let receipt = service
            .submit(&signed(
                &service,
                "owner",
                Instruction::Create {
                    pid: 0,
                    description: "Proposal #1".into(),
                },
            ))
            .await
            .unwrap();
        let proposal = receipt.proposal_address();
        assert_eq!(receipt.proposal().owner, identity("owner"));
        assert_eq!(
            proposal,
            service.proposal_address(&identity("owner"), 0).unwrap()
        );

        for (label, instruction) in [
            ("a", Instruction::VoteYes { proposal }),
            ("b", Instruction::VoteNo { proposal }),
            ("c", Instruction::VoteNo { proposal }),
        ] {
            service
                .submit(&signed(&service, label, instruction))
                .await
                .unwrap();
        }

        let err = service
            .submit(&signed(&service, "a", Instruction::VoteYes { proposal }))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "DuplicatedVoteNotAllowed");

        let stored = service.fetch_proposal(proposal).await.unwrap().unwrap();
        assert_eq!(stored.tally(), (1, 2));
    }

    #[tokio::test]
    async fn test_random_keys_vote() {
        let service = shared_service();
        let owner = SigningKey::generate(&mut OsRng);
        let program = service.program_id();

        let receipt = service
            .submit(
                &Transaction::sign(
                    &owner,
                    &program,
                    Instruction::Create {
                        pid: 200,
                        description: "random".into(),
                    },
                )
                .unwrap(),
            )
            .await
            .unwrap();

        let voter = SigningKey::generate(&mut OsRng);
        let tx = Transaction::sign(
            &voter,
            &program,
            Instruction::VoteYes {
                proposal: receipt.proposal_address(),
            },
        )
        .unwrap();
        let receipt = service.submit(&tx).await.unwrap();

        let (_, vote) = receipt.vote().unwrap();
        assert_eq!(vote.voter, tx.signer);
    }

    #[tokio::test]
    async fn test_cannot_vote_as_someone_else() {
        let service = shared_service();
        let proposal = service
            .create(&key("owner"), 0, "p".into())
            .await
            .unwrap()
            .proposal_address();

        // Mallory signs, then claims to be alice.
        let mut tx = signed(&service, "mallory", Instruction::VoteYes { proposal });
        tx.signer = identity("alice");

        let err = service.submit(&tx).await.unwrap_err();
        assert_eq!(err.code(), "ConstraintSigner");
        assert_eq!(err.number(), 2002);
        assert!(service.votes_for(proposal).await.unwrap().is_empty());

        // Alice can still vote herself.
        service
            .submit(&signed(&service, "alice", Instruction::VoteYes { proposal }))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_cannot_create_as_someone_else() {
        let service = shared_service();

        let mut tx = signed(
            &service,
            "mallory",
            Instruction::Create {
                pid: 0,
                description: "squatted".into(),
            },
        );
        tx.signer = identity("bob");
        assert!(service.submit(&tx).await.is_err());

        // Bob's slot is still free for bob.
        let receipt = service
            .create(&key("bob"), 0, "Proposal #1".into())
            .await
            .unwrap();
        assert_eq!(receipt.proposal().owner, identity("bob"));
        assert_eq!(
            receipt.proposal_address(),
            service.proposal_address(&identity("bob"), 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_foreign_program_signature_rejected() {
        let service = shared_service();
        let tx = Transaction::sign(
            &key("owner"),
            &Address::new([0xAB; 32]),
            Instruction::Create {
                pid: 0,
                description: "replayed".into(),
            },
        )
        .unwrap();

        let err = service.submit(&tx).await.unwrap_err();
        assert!(matches!(err, VotingError::SignatureVerificationFailed(_)));
        assert!(service.all_proposals().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupted_signature_rejected() {
        let service = shared_service();
        let mut tx = signed(
            &service,
            "owner",
            Instruction::Create {
                pid: 0,
                description: "p".into(),
            },
        );
        tx.signature[0] ^= 0xFF;

        assert!(service.submit(&tx).await.is_err());
        assert!(service.publisher().is_empty());
    }

    #[tokio::test]
    async fn test_valid_signature_still_validated() {
        let service = shared_service();
        let tx = signed(
            &service,
            "owner",
            Instruction::Create {
                pid: 0,
                description: "Very large description that will break the program!".into(),
            },
        );

        let err = service.submit(&tx).await.unwrap_err();
        assert_eq!(err.code(), "DescriptionTooLong");
    }
}
