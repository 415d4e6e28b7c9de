use anyhow::{Result, bail};
use std::io::{self, IsTerminal};
use zeroize::Zeroizing;

pub const PASSWORD_ENV: &str = "FLOWERPASS_PASSWORD";

/// Reads the master password from the first source that has one.
pub fn read_master_password() -> Result<Zeroizing<String>> {
    //  FLOWERPASS_PASSWORD="correct horse" flowerpass derive github.com
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        let pw = Zeroizing::new(pw);
        if !pw.is_empty() {
            tracing::debug!("master password taken from environment");
            return Ok(pw);
        }
    }

    //  printf "%s" "$SECRET" | flowerpass derive github.com
    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_line(&mut buf)?;
        trim_newline(&mut buf);

        if !buf.is_empty() {
            tracing::debug!("master password taken from stdin");
            return Ok(buf);
        }
    } else {
        let pw = Zeroizing::new(rpassword::prompt_password("Master password: ")?);
        if !pw.is_empty() {
            return Ok(pw);
        }
    }

    bail!("No master password provided")
}

fn trim_newline(s: &mut String) {
    while s.ends_with('\n') || s.ends_with('\r') {
        s.pop();
    }
}
