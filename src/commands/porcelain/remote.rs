use crate::areas::repository::Repository;
use crate::artifacts::branch::DEFAULT_REMOTE;
use crate::artifacts::branch::ref_namespace::pick_tracking_ref;

impl Repository {
    /// Remote configured for the current branch, `origin` when there is none
    pub async fn default_remote(&self) -> anyhow::Result<String> {
        let branch = self.current_branch();
        if branch.is_empty() {
            return Ok(DEFAULT_REMOTE.to_string());
        }

        let remote = self
            .git()
            .config_value(&format!("branch.{}.remote", branch))
            .await?;

        Ok(remote.unwrap_or_else(|| DEFAULT_REMOTE.to_string()))
    }

    /// Remote branch the current branch most likely tracks
    pub async fn corresponding_remote_ref(&self) -> anyhow::Result<String> {
        let remote = self.default_remote().await?;
        let branch = self.current_branch();
        let remote_branches = self.branch_list(true).await?;

        Ok(pick_tracking_ref(&remote, &branch, &remote_branches))
    }

    pub async fn show_default_remote(&self) -> anyhow::Result<()> {
        let remote = self.default_remote().await?;
        writeln!(self.writer(), "{}", remote)?;

        Ok(())
    }

    pub async fn show_tracking_ref(&self) -> anyhow::Result<()> {
        let remote_ref = self.corresponding_remote_ref().await?;
        writeln!(self.writer(), "{}", remote_ref)?;

        Ok(())
    }
}
