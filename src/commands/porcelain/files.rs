use crate::areas::repository::Repository;

impl Repository {
    /// Every file tracked by the index
    pub async fn all_files(&self) -> anyhow::Result<Vec<String>> {
        self.git().run_nul_separated(&["ls-files", "-z"]).await
    }

    /// Files changed according to `git diff <arg>`
    pub async fn diff_filenames(&self, arg: &str) -> anyhow::Result<Vec<String>> {
        self.git()
            .run_nul_separated(&["diff", "--name-only", "-z", arg])
            .await
    }

    pub async fn show_files(&self) -> anyhow::Result<()> {
        let files = self.all_files().await?;
        self.write_lines(&files)
    }

    pub async fn show_diff_files(&self, arg: &str) -> anyhow::Result<()> {
        let files = self.diff_filenames(arg).await?;
        self.write_lines(&files)
    }

    fn write_lines(&self, lines: &[String]) -> anyhow::Result<()> {
        let mut writer = self.writer();
        for line in lines {
            writeln!(writer, "{}", line)?;
        }

        Ok(())
    }
}
