//! 主机名拆分工具

use std::net::IpAddr;

/// 将主机名拆分为（子域名，根域名）
///
/// 根域名按公共后缀列表取可注册域（如 `example.co.uk`）。
/// IP地址、单段主机名以及本身就是公共后缀的主机名原样返回。
pub fn split_host(host: &str) -> (String, String) {
    let host = host.trim().trim_end_matches('.').to_lowercase();

    if host.parse::<IpAddr>().is_ok() {
        return (host.clone(), host);
    }

    let root_domain = psl::domain_str(&host)
        .map(str::to_string)
        .unwrap_or_else(|| host.clone());

    (host, root_domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_subdomain() {
        assert_eq!(
            split_host("Blog.Staging.Example.com."),
            ("blog.staging.example.com".to_string(), "example.com".to_string())
        );
    }

    #[test]
    fn test_split_multi_label_suffix() {
        assert_eq!(
            split_host("shop.example.co.uk"),
            ("shop.example.co.uk".to_string(), "example.co.uk".to_string())
        );
        assert_eq!(split_host("www.example.com.au").1, "example.com.au");
    }

    #[test]
    fn test_split_apex_and_ip() {
        assert_eq!(split_host("example.com"), ("example.com".to_string(), "example.com".to_string()));
        assert_eq!(split_host("192.0.2.7"), ("192.0.2.7".to_string(), "192.0.2.7".to_string()));
        assert_eq!(split_host("2001:db8::1"), ("2001:db8::1".to_string(), "2001:db8::1".to_string()));
        assert_eq!(split_host("localhost"), ("localhost".to_string(), "localhost".to_string()));
        assert_eq!(split_host("co.uk"), ("co.uk".to_string(), "co.uk".to_string()));
    }
}
