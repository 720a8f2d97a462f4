use clap::Parser;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "classforge", version)]
pub struct Args {
    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub index_dir: Option<String>,

    #[arg(long)]
    pub tmp_dir: Option<String>,

    #[arg(long, default_value_t = 120)]
    pub timeout_secs: u64,

    #[arg(long, default_value_t = false)]
    pub debug: bool,

    #[arg(long, default_value_t = false)]
    pub save_request: bool,

    #[arg(long, default_value_t = false)]
    pub save_response: bool,
}

impl Args {
    pub fn apply(&self, cfg: &mut Config) {
        if let Some(m) = &self.model {
            cfg.model = m.clone();
        }
        if let Some(d) = &self.index_dir {
            cfg.index_dir = d.clone();
        }
        if let Some(d) = &self.tmp_dir {
            cfg.tmp_dir = d.clone();
        }
        cfg.timeout_secs = self.timeout_secs;
        cfg.verbose = self.debug;
        cfg.save_request = self.save_request;
        cfg.save_response = self.save_response;
    }
}
