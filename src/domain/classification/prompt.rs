//! Prompt templates
//!
//! User input is interpolated verbatim. The model is the only judge; these
//! strings only describe the taxonomy and the expected output shape.

/// Prompt asking the model whether a message is legitimate or a scam
pub fn content_prompt(text: &str) -> String {
    format!(
        r#"
    You are an expert in identifying scam messages in text, email etc. Analyze the given text and classify it as:

    - **Real/Legitimate** (Authentic, safe message)
    - **Scam/Fake** (Phishing, fraud, or suspicious message)

    **for the following Text:**
    {text}

    **Return a clear message indicating whether this content is real or a scam.
    If it is a scam, mention why it seems fraudulent. If it is real, state that it is legitimate.**

    **Only return the classification message and nothing else.**
    Note: Don't return empty or null, you only need to return message for the input text
    "#
    )
}

/// Prompt asking the model for the security class of a URL
pub fn url_prompt(url: &str) -> String {
    format!(
        r#"
    You are an advanced AI model specializing in URL security classification. Analyze the given URL and classify it as one of the following categories:

    1. Benign**: Safe, trusted, and non-malicious websites such as google.com, wikipedia.org, amazon.com.
    2. Phishing**: Fraudulent websites designed to steal personal information. Indicators include misspelled domains (e.g., paypa1.com instead of paypal.com), unusual subdomains, and misleading content.
    3. Malware**: URLs that distribute viruses, ransomware, or malicious software. Often includes automatic downloads or redirects to infected pages.
    4. Defacement**: Hacked or defaced websites that display unauthorized content, usually altered by attackers.

    **Example URLs and Classifications:**
    - **Benign**: "https://www.microsoft.com/"
    - **Phishing**: "http://secure-login.paypa1.com/"
    - **Malware**: "http://free-download-software.xyz/"
    - **Defacement**: "http://hacked-website.com/"

    **Input URL:** {url}

    **Output Format:**
    - Return only a string class name
    - Example output for a phishing site: phishing

    Analyze the URL and return the correct classification (Only name in lowercase such as benign etc.)
    Note: Don't return empty or null, at any cost return the corrected class
    "#
    )
}
