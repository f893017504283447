use predicates::prelude::*;

mod common;
use common::{assertions, fixtures::*, repository::*};

#[cfg(test)]
mod pop_command_tests {
    use super::*;

    #[test]
    fn test_push_then_pop_round_trip() -> anyhow::Result<()> {
        let repo = setup_repo_with_origin()?;
        create_file(repo.path(), "wip.txt", "work in progress")?;
        create_file(repo.path(), "initial.txt", "edited content\n")?;
        create_file(repo.path(), "nested/deep.txt", "deep\n")?;

        stash_cmd(&repo)?.assert().success();
        assert_eq!(remote_stash_branches(&repo)?.len(), 1);
        assert_eq!(read_file(repo.path(), "initial.txt")?, "initial content\n");

        stash_cmd(&repo)?.arg("pop").assert().success();

        assert_eq!(read_file(repo.path(), "wip.txt")?, "work in progress");
        assert_eq!(read_file(repo.path(), "initial.txt")?, "edited content\n");
        assert_eq!(read_file(repo.path(), "nested/deep.txt")?, "deep\n");
        assert!(remote_stash_branches(&repo)?.is_empty());

        // the branch pointer is unchanged; the changes are uncommitted again
        assert_eq!(git(repo.path(), &["log", "-1", "--format=%s"])?, "Initial commit");
        assert!(status_porcelain(&repo)?.contains("initial.txt"));
        Ok(())
    }

    #[test]
    fn test_pop_by_number_and_full_name() -> anyhow::Result<()> {
        let repo = setup_repo_with_origin()?;
        push_stash_branch(&repo, "8stash/11", &[("a.txt", "a\n")], 0)?;
        push_stash_branch(&repo, "8stash/22", &[("b.txt", "b\n")], 0)?;

        stash_cmd(&repo)?.args(["pop", "11"]).assert().success();
        assert_eq!(read_file(repo.path(), "a.txt")?, "a\n");
        assert_eq!(remote_stash_branches(&repo)?, vec!["8stash/22".to_string()]);

        std::fs::remove_file(repo.path().join("a.txt"))?;
        stash_cmd(&repo)?.args(["pop", "8stash/22"]).assert().success();
        assert_eq!(read_file(repo.path(), "b.txt")?, "b\n");
        assert!(remote_stash_branches(&repo)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_pop_without_identifier_is_ambiguous() -> anyhow::Result<()> {
        let repo = setup_repo_with_origin()?;
        push_stash_branch(&repo, "8stash/1", &[("a.txt", "a\n")], 0)?;
        push_stash_branch(&repo, "8stash/2", &[("b.txt", "b\n")], 0)?;

        for args in [vec!["pop"], vec!["pop", "0"]] {
            stash_cmd(&repo)?
                .args(&args)
                .assert()
                .failure()
                .code(1)
                .stderr(assertions::operation_error("pop"))
                .stderr(assertions::ambiguous_selection());
        }
        assert_eq!(remote_stash_branches(&repo)?.len(), 2);
        Ok(())
    }

    #[test]
    fn test_pop_sentinel_with_single_stash() -> anyhow::Result<()> {
        let repo = create_single_stash_repo()?;
        stash_cmd(&repo)?.args(["pop", "0"]).assert().success();
        assert_eq!(read_file(repo.path(), "wip.txt")?, "work in progress");
        Ok(())
    }

    #[test]
    fn test_pop_with_no_stashes() -> anyhow::Result<()> {
        let repo = setup_repo_with_origin()?;
        stash_cmd(&repo)?
            .arg("pop")
            .assert()
            .failure()
            .stderr(predicate::str::contains("no stashes found"));
        Ok(())
    }

    #[test]
    fn test_pop_unknown_identifier() -> anyhow::Result<()> {
        let repo = create_single_stash_repo()?;
        stash_cmd(&repo)?
            .args(["pop", "999"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("no stash named \"8stash/999\" found"));
        assert_eq!(remote_stash_branches(&repo)?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_pop_refuses_dirty_tracked_files() -> anyhow::Result<()> {
        let repo = create_single_stash_repo()?;
        create_file(repo.path(), "initial.txt", "unsaved edit\n")?;

        stash_cmd(&repo)?
            .arg("pop")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Local changes to tracked files"));

        assert_eq!(read_file(repo.path(), "initial.txt")?, "unsaved edit\n");
        assert_eq!(remote_stash_branches(&repo)?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_pop_merges_when_branch_moved_on() -> anyhow::Result<()> {
        let repo = setup_repo_with_origin()?;
        push_stash_branch(&repo, "8stash/5", &[("stash.txt", "from stash\n")], 0)?;

        create_file(repo.path(), "main.txt", "from main\n")?;
        commit_all(repo.path(), "Main moves on")?;
        git(repo.path(), &["push", "-q", "origin", "main"])?;

        stash_cmd(&repo)?.arg("pop").assert().success();

        assert_eq!(read_file(repo.path(), "stash.txt")?, "from stash\n");
        assert_eq!(read_file(repo.path(), "main.txt")?, "from main\n");
        assert!(remote_stash_branches(&repo)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_pop_conflict_keeps_stash_branch() -> anyhow::Result<()> {
        let repo = setup_repo_with_origin()?;
        push_stash_branch(&repo, "8stash/6", &[("initial.txt", "stash version\n")], 0)?;

        create_file(repo.path(), "initial.txt", "main version\n")?;
        commit_all(repo.path(), "Main edits initial.txt")?;
        git(repo.path(), &["push", "-q", "origin", "main"])?;

        stash_cmd(&repo)?
            .arg("pop")
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("automatic merge failed"))
            .stderr(predicate::str::contains("CONFLICT"));

        assert_eq!(remote_stash_branches(&repo)?, vec!["8stash/6".to_string()]);
        assert!(read_file(repo.path(), "initial.txt")?.contains("<<<<<<<"));
        Ok(())
    }

    #[test]
    fn test_pop_refuses_to_overwrite_untracked_files() -> anyhow::Result<()> {
        let repo = setup_repo_with_origin()?;
        push_stash_branch(&repo, "8stash/7", &[("notes.txt", "stashed\n")], 0)?;
        create_file(repo.path(), "notes.txt", "precious untracked\n")?;

        stash_cmd(&repo)?
            .args(["pop", "7"])
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains(
                "untracked files would be overwritten by the stash: notes.txt",
            ));

        assert_eq!(read_file(repo.path(), "notes.txt")?, "precious untracked\n");
        assert_eq!(remote_stash_branches(&repo)?, vec!["8stash/7".to_string()]);
        Ok(())
    }
}
