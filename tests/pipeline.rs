mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::RecordingShell;
use deskgate::{Config, Context, Pipeline, ProvisionError, ProvisionResult, Step};

struct Probe {
    name: &'static str,
    fail: bool,
    log: Rc<RefCell<Vec<&'static str>>>,
}

impl Step for Probe {
    fn name(&self) -> &'static str {
        self.name
    }

    fn run(&self, _ctx: &Context<'_>) -> ProvisionResult<()> {
        self.log.borrow_mut().push(self.name);
        if self.fail {
            Err(ProvisionError::Other("boom".into()))
        } else {
            Ok(())
        }
    }
}

fn probe(name: &'static str, fail: bool, log: &Rc<RefCell<Vec<&'static str>>>) -> Box<dyn Step> {
    Box::new(Probe {
        name,
        fail,
        log: Rc::clone(log),
    })
}

#[test]
fn default_step_order() {
    let pipeline = Pipeline::new(Config::new());

    assert_eq!(
        pipeline.step_names(),
        vec![
            "preflight",
            "packages",
            "user",
            "firewall",
            "image",
            "stack",
            "verify",
            "publish"
        ]
    );
}

#[test]
fn stops_at_first_failure() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let pipeline = Pipeline::new(Config::new())
        .shell(RecordingShell::new())
        .steps(vec![
            probe("one", false, &log),
            probe("two", true, &log),
            probe("three", false, &log),
        ]);

    let err = pipeline.execute().unwrap_err();

    assert_eq!(*log.borrow(), vec!["one", "two"]);
    assert!(matches!(err, ProvisionError::Step { ref step, .. } if step == "two"));
}

#[test]
fn full_run_on_clean_host() {
    let work = tempfile::tempdir().unwrap();
    let install = tempfile::tempdir().unwrap();
    let shell = RecordingShell::new()
        .output("id -u", "0")
        .fail("id -u ciuser")
        .output("docker ps --format {{.Names}}", "guacd\nmysql\nguacamole")
        .output("hostname -I", "10.0.0.7");
    let config = Config::new()
        .work_dir(work.path())
        .install_dir(install.path())
        .verify_delay_secs(0);

    Pipeline::new(config)
        .shell(shell.clone())
        .execute()
        .unwrap();

    let calls = shell.calls();
    assert!(calls.contains(&"useradd -m -s /bin/bash ciuser".to_string()));
    assert!(calls.contains(&"usermod -aG sudo ciuser".to_string()));
    for port in ["22", "3389", "8080"] {
        assert!(calls.contains(&format!("ufw allow {port}/tcp")));
    }
    assert_eq!(shell.calls_starting_with("docker build").len(), 1);
    assert_eq!(shell.calls_starting_with("docker-compose").len(), 1);
    assert!(
        !calls.iter().any(|c| c.contains(" remote ")),
        "publish disabled must not touch remotes"
    );
    assert!(install.path().join("README.md").exists());
}

#[test]
fn rerun_on_provisioned_host() {
    let work = tempfile::tempdir().unwrap();
    let install = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(install.path().join(".git")).unwrap();
    let shell = RecordingShell::new()
        .output("id -u", "0")
        .fail(&format!("git -C {} commit", install.path().display()));
    let config = Config::new()
        .work_dir(work.path())
        .install_dir(install.path())
        .verify_delay_secs(0);

    Pipeline::new(config)
        .shell(shell.clone())
        .execute()
        .unwrap();

    assert!(shell.calls_starting_with("useradd").is_empty());
    assert!(!shell.calls().iter().any(|c| c.ends_with(" init")));
}
