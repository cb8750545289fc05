use cursive::{
    view::{Nameable, Resizable},
    views::{Dialog, LinearLayout, TextView},
    Cursive, CursiveExt,
};
use cursive_togglable_secret_field::{SecretContent, TogglableSecretField};

fn main() {
    let mut cursive = Cursive::default();

    let password = SecretContent::new();
    let committed = password.clone();

    let field = TogglableSecretField::new("Password", password)
        .left_view(TextView::new("> "))
        .on_submit(move |siv| {
            let value = committed.value();
            siv.find_name::<TextView>("status")
                .unwrap()
                .set_content(format!("committed {} characters", value.len()));
        });

    let ll = LinearLayout::vertical()
        .child(field.with_name("password").fixed_size((40, 1)))
        .child(TextView::new("Ctrl+R or click <Show> to reveal").with_name("status"));

    cursive.add_layer(Dialog::around(ll).title("TogglableSecretField"));

    cursive.run()
}
