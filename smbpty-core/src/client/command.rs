//! Command line encoding

/// Join `command` and its arguments, each argument wrapped in double quotes
///
/// Embedded double quotes are passed through unescaped; smbclient offers no
/// escape for them, so names containing `"` cannot be addressed.
pub fn wrap<I, S>(command: &str, args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut line = command.to_string();
    for arg in args {
        line.push_str(" \"");
        line.push_str(arg.as_ref());
        line.push('"');
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_argument_keeps_spaces_inside_quotes() {
        assert_eq!(wrap("del", ["a b"]), "del \"a b\"");
    }

    #[test]
    fn arguments_keep_their_order() {
        assert_eq!(
            wrap("get", ["remote name.txt", "/tmp/local.txt"]),
            "get \"remote name.txt\" \"/tmp/local.txt\""
        );
    }

    #[test]
    fn owned_arguments_are_accepted() {
        let args = vec!["*".to_string()];
        assert_eq!(wrap("ls", &args), "ls \"*\"");
    }

    #[test]
    fn no_arguments_is_just_the_command() {
        assert_eq!(wrap("pwd", Vec::<String>::new()), "pwd");
    }

    #[test]
    fn embedded_quotes_are_not_escaped() {
        assert_eq!(wrap("del", ["say \"hi\""]), "del \"say \"hi\"\"");
    }
}
