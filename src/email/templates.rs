//! Fixed email bodies. The recipient name is inserted as given, without HTML escaping.

pub const VERIFICATION_SUBJECT: &str = "Verify Your NutriFit Account";
pub const PASSWORD_RESET_SUBJECT: &str = "Reset Your NutriFit Password";

pub fn verification_html(user_name: &str, url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Verify Your Email</title>
</head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
    <div style="background-color: #f8f9fa; border-radius: 10px; padding: 30px; margin-bottom: 20px;">
        <h1 style="color: #28a745; margin-bottom: 20px;">Welcome to NutriFit!</h1>
        <p>Hi {user_name},</p>
        <p>Thank you for registering with NutriFit. Please verify your email address to activate your account.</p>
        <div style="text-align: center; margin: 30px 0;">
            <a href="{url}"
               style="display: inline-block; background-color: #28a745; color: white; padding: 12px 30px; text-decoration: none; border-radius: 5px; font-weight: bold;">
                Verify Email Address
            </a>
        </div>
        <p>Or copy and paste this link into your browser:</p>
        <p style="word-break: break-all; color: #666; font-size: 14px;">{url}</p>
        <p style="color: #999; font-size: 12px; margin-top: 30px;">
            This verification link will expire in 24 hours. If you didn't create an account with NutriFit, please ignore this email.
        </p>
    </div>
    <div style="text-align: center; color: #999; font-size: 12px;">
        <p>&copy; 2025 NutriFit. All rights reserved.</p>
    </div>
</body>
</html>
"#
    )
}

pub fn verification_text(user_name: &str, url: &str) -> String {
    format!(
        "Welcome to NutriFit!

Hi {user_name},

Thank you for registering with NutriFit. Please verify your email address to activate your account.

Click the link below to verify your email:
{url}

This verification link will expire in 24 hours.

If you didn't create an account with NutriFit, please ignore this email.

Best regards,
The NutriFit Team
"
    )
}

pub fn password_reset_html(user_name: &str, url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Reset Your Password</title>
</head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
    <div style="background-color: #f8f9fa; border-radius: 10px; padding: 30px; margin-bottom: 20px;">
        <h1 style="color: #dc3545; margin-bottom: 20px;">Reset Your Password</h1>
        <p>Hi {user_name},</p>
        <p>We received a request to reset your password for your NutriFit account.</p>
        <div style="text-align: center; margin: 30px 0;">
            <a href="{url}"
               style="display: inline-block; background-color: #dc3545; color: white; padding: 12px 30px; text-decoration: none; border-radius: 5px; font-weight: bold;">
                Reset Password
            </a>
        </div>
        <p>Or copy and paste this link into your browser:</p>
        <p style="word-break: break-all; color: #666; font-size: 14px;">{url}</p>
        <p style="color: #999; font-size: 12px; margin-top: 30px;">
            This password reset link will expire in 1 hour. If you didn't request a password reset, please ignore this email.
        </p>
    </div>
    <div style="text-align: center; color: #999; font-size: 12px;">
        <p>&copy; 2025 NutriFit. All rights reserved.</p>
    </div>
</body>
</html>
"#
    )
}

pub fn password_reset_text(user_name: &str, url: &str) -> String {
    format!(
        "Reset Your Password

Hi {user_name},

We received a request to reset your password for your NutriFit account.

Click the link below to reset your password:
{url}

This password reset link will expire in 1 hour.

If you didn't request a password reset, please ignore this email.

Best regards,
The NutriFit Team
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bodies_state_expiry() {
        let url = "https://app.test/verify-email?token=t";
        assert!(verification_html("Ana", url).contains("expire in 24 hours"));
        assert!(verification_text("Ana", url).contains("expire in 24 hours"));
        assert!(password_reset_html("Ana", url).contains("expire in 1 hour"));
        assert!(password_reset_text("Ana", url).contains("expire in 1 hour"));
    }

    #[test]
    fn link_appears_as_button_and_plain_copy() {
        let url = "https://app.test/reset-password?token=abc";
        let html = password_reset_html("Ana", url);
        assert_eq!(html.matches(url).count(), 2);
    }

    #[test]
    fn name_is_inserted_verbatim() {
        let html = verification_html("<b>Ana</b>", "u");
        assert!(html.contains("Hi <b>Ana</b>,"));
    }
}
