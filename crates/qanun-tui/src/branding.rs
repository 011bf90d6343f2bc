pub const APP_NAME: &str = "المساعد القانوني الذكي";
pub const APP_SHORT_NAME: &str = "Qanun";
pub const APP_VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

pub const GREETING: &str = "مرحباً بك في المساعد القانوني الذكي! كيف يمكنني مساعدتك اليوم؟";
pub const CONNECTION_ERROR: &str = "حدث خطأ في الاتصال. الرجاء المحاولة لاحقاً.";
pub const EMPTY_HISTORY: &str = "لا توجد محادثات سابقة";
pub const BOT_BADGE: &str = "المساعد الذكي";
pub const USER_LABEL: &str = "أنت";
pub const DICTATION_UNSUPPORTED: &str =
    "التعرف على الصوت غير متاح. يُرجى ضبط أمر الإملاء (dictation.command) في ملف الإعدادات.";
pub const RECORDING_LABEL: &str = "جارٍ التسجيل";
pub const INPUT_PLACEHOLDER: &str = "اكتب سؤالك القانوني هنا...";
pub const HISTORY_TITLE: &str = "المحادثات السابقة";
pub const KEYBOARD_TITLE: &str = "لوحة المفاتيح العربية";
