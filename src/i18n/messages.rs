// src/i18n/messages.rs
// Every user-facing message, in English and Chinese.

use super::Text;

// Input / search
pub const REPOSITORY_URL: Text = Text { en: "Repository URL", zh: "仓库 URL" };
pub const EXAMPLE: Text = Text { en: "Example", zh: "示例" };
pub const LOADING: Text = Text { en: "Loading", zh: "加载中" };
pub const ENTER_REPO: Text = Text {
    en: "Please enter the repository URL",
    zh: "请输入仓库 URL",
};
pub const INVALID_REPO: Text = Text {
    en: "Please enter a valid GitHub repository URL in the format: username/repository or https://github.com/username/repository",
    zh: "请输入有效的 GitHub 仓库 URL，格式为：username/repository 或 https://github.com/username/repository",
};
pub const SUCCESS_FOUND: Text = Text {
    en: "Success! Found {{count}} contributors.",
    zh: "成功！找到 {{count}} 个贡献者。",
};
pub const SEARCH_FAILED: Text = Text {
    en: "An error occurred during the search. Please try again later.",
    zh: "搜索过程中发生错误，请稍后重试。",
};
pub const NO_DATA: Text = Text { en: "No data available", zh: "暂无数据" };

// API errors
pub const REPO_NOT_FOUND: Text = Text {
    en: "Repository {{repo}} was not found.",
    zh: "未找到仓库 {{repo}}。",
};
pub const RATE_LIMITED: Text = Text {
    en: "GitHub API rate limit exceeded. Set a token with --token or GITHUB_TOKEN and try again.",
    zh: "GitHub API 请求次数已达上限，请通过 --token 或 GITHUB_TOKEN 设置令牌后重试。",
};
pub const FORBIDDEN: Text = Text {
    en: "GitHub refused access to this repository.",
    zh: "GitHub 拒绝访问该仓库。",
};
pub const UNAUTHORIZED: Text = Text {
    en: "The GitHub token was rejected.",
    zh: "GitHub 令牌无效。",
};
pub const REQUEST_FAILED: Text = Text {
    en: "GitHub API request failed: {{status}}",
    zh: "GitHub API 请求失败：{{status}}",
};

// Views and exports
pub const JSON_COPIED: Text = Text {
    en: "JSON copied to clipboard",
    zh: "JSON 已复制到剪贴板",
};
pub const MARKDOWN_COPIED: Text = Text {
    en: "Markdown copied to clipboard",
    zh: "Markdown 已复制到剪贴板",
};
pub const IMAGE_COPIED: Text = Text {
    en: "Image copied to clipboard",
    zh: "图片已复制到剪贴板",
};
pub const IMAGE_EXPORTED: Text = Text {
    en: "Image exported successfully!",
    zh: "图片导出成功！",
};
pub const FILE_WRITTEN: Text = Text { en: "Wrote {{path}}", zh: "已写入 {{path}}" };
pub const CLIPBOARD_FAILED: Text = Text {
    en: "Could not access the clipboard: {{error}}",
    zh: "无法访问剪贴板：{{error}}",
};
pub const AVATARS_MISSING: Text = Text {
    en: "{{count}} avatar(s) could not be loaded and were replaced by placeholders.",
    zh: "{{count}} 个头像加载失败，已使用占位图代替。",
};

// Language / misc
pub const LANGUAGE_CURRENT: Text = Text {
    en: "Language: {{language}}",
    zh: "当前语言：{{language}}",
};
pub const SWITCH_TO_CHINESE: Text = Text { en: "Switch to Chinese", zh: "切换成中文" };
pub const SWITCH_TO_ENGLISH: Text = Text { en: "Switch to English", zh: "切换成英文" };
pub const CACHE_CLEARED: Text = Text { en: "Cache cleared", zh: "缓存已清除" };
pub const APP_INFO: Text = Text {
    en: "Hub-IO allows you to get repository information from GitHub, export to JSON or Image.",
    zh: "Hub-IO 可以从 GitHub 获取仓库信息，并导出为 JSON 或图片。",
};
pub const SHELL_HELP: Text = Text {
    en: "Type owner/repo and press Enter. Commands: :lang [en|zh], :clear, :quit",
    zh: "输入 owner/repo 并回车。命令：:lang [en|zh]、:clear、:quit",
};
