use crate::shared::config::model::{
    CpuConfig, GroupConfig, IdleConfig, LoggingConfig, MemoryConfig, NotifyConfig, SelectorKind,
    Settings, TerminateConfig, TierConfig, TimeConfig, TransportKind,
};

pub struct SettingsFactory {
    settings: Settings,
}

impl SettingsFactory {
    pub fn new() -> Self {
        Self {
            settings: Settings {
                email: vec!["ops@example.com".to_string()],
                memory: MemoryConfig {
                    total_bytes: Some(100),
                    critical_fraction: 0.9,
                    critical_sustained_secs: 0,
                    terminate: TerminateConfig::default(),
                    tiers: vec![
                        TierConfig {
                            fraction: 0.5,
                            sustained_hours: 0.0,
                        },
                        TierConfig {
                            fraction: 0.2,
                            sustained_hours: 6.0,
                        },
                    ],
                },
                cpu: CpuConfig::default(),
                time: TimeConfig {
                    update_secs: 60,
                    warning_cooldown_secs: 3600,
                    min_idle_secs: 3600,
                },
                idle: IdleConfig::default(),
                group: GroupConfig {
                    selector: SelectorKind::All,
                    pgid: None,
                    root_pid: None,
                    pids: Vec::new(),
                    user: None,
                    exclude_users: vec!["root".to_string()],
                },
                notify: NotifyConfig {
                    transport: TransportKind::Log,
                    ..NotifyConfig::default()
                },
                logging: LoggingConfig::default(),
            },
        }
    }

    pub fn tiers(mut self, tiers: &[(f64, f64)]) -> Self {
        self.settings.memory.tiers = tiers
            .iter()
            .map(|(fraction, sustained_hours)| TierConfig {
                fraction: *fraction,
                sustained_hours: *sustained_hours,
            })
            .collect();
        self
    }

    pub fn critical(mut self, fraction: f64) -> Self {
        self.settings.memory.critical_fraction = fraction;
        self
    }

    pub fn terminate(mut self, active: bool, fraction: Option<f64>) -> Self {
        self.settings.memory.terminate = TerminateConfig {
            active,
            terminate_fraction: fraction,
        };
        self
    }

    pub fn cooldown_secs(mut self, secs: i64) -> Self {
        self.settings.time.warning_cooldown_secs = secs;
        self
    }

    pub fn update_secs(mut self, secs: i64) -> Self {
        self.settings.time.update_secs = secs;
        self
    }

    pub fn exclude_idle(mut self, exclude: bool) -> Self {
        self.settings.idle.exclude_idle = exclude;
        self
    }

    pub fn email(mut self, email: &[&str]) -> Self {
        self.settings.email = email.iter().map(|e| e.to_string()).collect();
        self
    }

    pub fn group(mut self, group: GroupConfig) -> Self {
        self.settings.group = group;
        self
    }

    pub fn with(mut self, edit: impl FnOnce(&mut Settings)) -> Self {
        edit(&mut self.settings);
        self
    }

    pub fn create(self) -> Settings {
        self.settings
    }
}
