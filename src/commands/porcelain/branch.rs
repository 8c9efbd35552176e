use crate::areas::repository::Repository;
use crate::artifacts::branch::ref_namespace::RefNamespace;
use colored::Colorize;

impl Repository {
    /// Local or remote branch names, without their namespace prefix
    pub async fn branch_list(&self, remote: bool) -> anyhow::Result<Vec<String>> {
        let namespace = RefNamespace::from_remote_flag(remote);
        let output = self
            .git()
            .run_text(&["for-each-ref", "--format=%(refname)", namespace.prefix()])
            .await?;

        Ok(namespace.parse_listing(&output))
    }

    pub fn show_current_branch(&self) -> anyhow::Result<()> {
        writeln!(self.writer(), "{}", self.current_branch())?;

        Ok(())
    }

    pub fn show_head_state(&self) -> anyhow::Result<()> {
        writeln!(self.writer(), "{}", self.resolver().resolve_head_state())?;

        Ok(())
    }

    pub async fn show_branches(&self, remote: bool) -> anyhow::Result<()> {
        let branches = self.branch_list(remote).await?;
        let current = if remote {
            None
        } else {
            Some(self.current_branch())
        };

        for branch in branches {
            if current.as_deref() == Some(branch.as_str()) {
                writeln!(self.writer(), "* {}", branch.green())?;
            } else if remote {
                writeln!(self.writer(), "{}", branch)?;
            } else {
                writeln!(self.writer(), "  {}", branch)?;
            }
        }

        Ok(())
    }
}
