use super::*;

#[test]
fn content_type_follows_extension() {
    assert_eq!(content_type_for(Path::new("a/cat.PNG")), Some("image/png"));
    assert_eq!(content_type_for(Path::new("dog.jpeg")), Some("image/jpeg"));
    assert_eq!(content_type_for(Path::new("notes.txt")), None);
    assert_eq!(content_type_for(Path::new("README")), None);
}

#[test]
fn read_upload_missing_file_reports_path() {
    let err = read_upload(Path::new("/definitely/not/here.png")).unwrap_err();
    assert!(err.to_string().contains("/definitely/not/here.png"));
}

#[test]
fn rejected_auth_surfaces_server_message() {
    let err = finish_auth(AuthOutcome::Rejected { message: "Login failed.".to_owned() }).unwrap_err();
    assert_eq!(err.to_string(), "Login failed.");
}

#[test]
fn error_line_prints_core_message_verbatim() {
    let err = CliError::Rejected("Login failed.".to_owned());
    assert_eq!(error_line(&err), "error: Login failed.");
    let err = CliError::Client(ClientError::Api { status: 500, message: Some("Image upload failed.".to_owned()) });
    assert_eq!(error_line(&err), "error: request failed (500): Image upload failed.");
}

#[test]
fn cli_parses_upload_files_in_order() {
    let cli = Cli::try_parse_from(["gallery-cli", "images", "upload", "b.png", "a.png"]).unwrap();
    let Command::Images(ImagesCommand { command: ImagesSubcommand::Upload { files } }) = cli.command else {
        panic!("expected upload");
    };
    assert_eq!(files, vec![PathBuf::from("b.png"), PathBuf::from("a.png")]);
}
