use pathpipe::plugin::{self, PathPlugin};
use pathpipe::{codec, executor, CommandDefinition, Error, PluginRegistry};

fn backup_name_command() -> CommandDefinition {
    CommandDefinition {
        id: "backup-name".to_string(),
        name: "Backup file name".to_string(),
        description: Some("File name without extension, with .bak appended".to_string()),
        elements: "apply,file-name;noext;suffix,.bak".to_string(),
        group_id: Some(4),
        group_position: Some(0),
        file_filter: Some(r"\.(txt|log)$".to_string()),
    }
}

#[test]
fn pipeline_command_behaves_like_a_native_plugin() {
    let registry = plugin::build_registry(&[backup_name_command()]).unwrap();
    let plugin = registry.resolve("backup-name").unwrap();

    assert_eq!(plugin.description(), "Backup file name");
    assert_eq!(
        plugin.help_text().as_deref(),
        Some("File name without extension, with .bak appended")
    );
    assert_eq!(plugin.group_id(), Some(4));
    assert_eq!(plugin.group_position(), Some(0));

    assert_eq!(
        plugin.get_path("/var/log/system.log").unwrap(),
        "system.bak"
    );
}

#[test]
fn enabled_predicate_follows_the_file_filter() {
    let registry = plugin::build_registry(&[backup_name_command()]).unwrap();
    let plugin = registry.resolve("backup-name").unwrap();

    assert!(plugin.enabled("/var/log", "system.log"));
    assert!(!plugin.enabled("/var/log", "system.db"));

    // Builtins carry no filter and are always enabled.
    let builtin = registry.resolve("long-path").unwrap();
    assert!(builtin.enabled("/var/log", "system.db"));
}

#[test]
fn executing_an_encoded_pipeline_end_to_end() {
    let registry = PluginRegistry::with_builtins();
    let pipeline = codec::decode_pipeline("apply,long-path;fslash;optquotes").unwrap();

    assert_eq!(
        executor::run(&pipeline, "C:\\Program Files\\app", &registry).unwrap(),
        "\"C:/Program Files/app\""
    );
    assert_eq!(
        executor::run(&pipeline, "C:\\tools\\app", &registry).unwrap(),
        "C:/tools/app"
    );
}

#[test]
fn pipelines_anchor_to_builtins_not_to_other_pipelines() {
    let chained = CommandDefinition {
        id: "chained".to_string(),
        name: "Chained".to_string(),
        description: None,
        elements: "apply,backup-name".to_string(),
        group_id: None,
        group_position: None,
        file_filter: None,
    };
    let registry = plugin::build_registry(&[backup_name_command(), chained]).unwrap();
    let plugin = registry.resolve("chained").unwrap();

    // "backup-name" is a pipeline command, not a base plugin, so resolving
    // it from inside another pipeline fails at run time.
    let err = plugin.get_path("/a/b.txt").unwrap_err();
    assert!(matches!(err, Error::UnresolvedPlugin(id) if id == "backup-name"));
}
