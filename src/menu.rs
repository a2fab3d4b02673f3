use teloxide::types::{KeyboardButton, KeyboardMarkup, ParseMode};

/// One button of the main menu. Labels are matched byte-for-byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuEntry {
    Sos,
    DailyTip,
    Breathing,
    Encouragement,
    ProfessionalHelp,
    About,
}

impl MenuEntry {
    /// Keyboard order, two per row.
    pub const ALL: [MenuEntry; 6] = [
        MenuEntry::Sos,
        MenuEntry::DailyTip,
        MenuEntry::Breathing,
        MenuEntry::Encouragement,
        MenuEntry::ProfessionalHelp,
        MenuEntry::About,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuEntry::Sos => "🆘 እርዳኝ (SOS)",
            MenuEntry::DailyTip => "💡 የዕለቱ ምክር",
            MenuEntry::Breathing => "🧘 የመተንፈስ ልምምድ",
            MenuEntry::Encouragement => "💪 ማበረታቻ",
            MenuEntry::ProfessionalHelp => "📞 የባለሙያ እርዳታ",
            MenuEntry::About => "ℹ️ ስለ ቦቱ",
        }
    }

    pub fn reply(self) -> &'static str {
        match self {
            MenuEntry::Sos => SOS_REPLY,
            MenuEntry::DailyTip => DAILY_TIP_REPLY,
            MenuEntry::Breathing => BREATHING_REPLY,
            MenuEntry::Encouragement => ENCOURAGEMENT_REPLY,
            MenuEntry::ProfessionalHelp => PROFESSIONAL_HELP_REPLY,
            MenuEntry::About => ABOUT_REPLY,
        }
    }

    /// Entries whose reply text carries HTML tags.
    pub fn parse_mode(self) -> Option<ParseMode> {
        match self {
            MenuEntry::Sos | MenuEntry::Breathing | MenuEntry::ProfessionalHelp => {
                Some(ParseMode::Html)
            }
            MenuEntry::DailyTip | MenuEntry::Encouragement | MenuEntry::About => None,
        }
    }

    /// Exact match only: no trimming, no case folding.
    pub fn from_label(text: &str) -> Option<MenuEntry> {
        Self::ALL.into_iter().find(|entry| entry.label() == text)
    }
}

/// The main reply keyboard: all six labels, two per row, resized to fit.
pub fn menu_keyboard() -> KeyboardMarkup {
    let rows: Vec<Vec<KeyboardButton>> = MenuEntry::ALL
        .chunks(2)
        .map(|row| row.iter().map(|entry| KeyboardButton::new(entry.label())).collect())
        .collect();
    KeyboardMarkup::new(rows).resize_keyboard()
}

const SOS_REPLY: &str = "<b>🆘 አሁን ቆም በል። ይህ ስሜት ያልፋል።</b>\n\n\
<b>1.</b> ያለህበትን ቦታ ለቀህ ውጣ፤ ለጥቂት ደቂቃዎች ተራመድ።\n\
<b>2.</b> ቀስ ብለህ ተንፍስ፦ በ4 ቆጠራ አስገባ፣ በ4 ያዝ፣ በ6 አውጣ።\n\
<b>3.</b> ቀዝቃዛ ውሃ ጠጣ ወይም ፊትህን ታጠብ።\n\
<b>4.</b> ለምታምነው ሰው አሁኑኑ ደውል ወይም መልእክት ላክ።\n\n\
ፍላጎቱ እንደ ማዕበል ነው፤ ከፍ ይላል፣ ከዚያም ይወርዳል። ከ15–20 ደቂቃ በኋላ ይቀንሳል።";

const DAILY_TIP_REPLY: &str = "💡 የዕለቱ ምክር\n\n\
ዛሬን ብቻ አስብ። ለዘላለም ማቆም ከባድ ሊመስል ይችላል፤ ዛሬን ብቻ ግን ማለፍ ትችላለህ።\n\n\
ፍላጎቱን የሚቀሰቅሱብህን ሰዎች፣ ቦታዎችና ሰዓቶች ለይተህ ጻፍ፤ ከዚያም ለእያንዳንዳቸው አማራጭ እቅድ አዘጋጅ።";

const BREATHING_REPLY: &str = "<b>🧘 የ4-7-8 የመተንፈስ ልምምድ</b>\n\n\
• ምቹ ሆነህ ተቀመጥ፣ ዓይንህን ጨፍን።\n\
• በአፍንጫህ ለ<b>4</b> ሰከንድ አየር አስገባ።\n\
• ትንፋሽህን ለ<b>7</b> ሰከንድ ያዝ።\n\
• በአፍህ ለ<b>8</b> ሰከንድ ቀስ ብለህ አውጣ።\n\n\
ይህንን አራት ጊዜ ድገም። ሰውነትህ ሲረጋጋ አእምሮህም ይረጋጋል።";

const ENCOURAGEMENT_REPLY: &str = "💪 አንተ ከምታስበው በላይ ጠንካራ ነህ!\n\n\
እያንዳንዱ ያለፍከው ቀን ድል ነው። ብትወድቅም እንኳ ተነስተህ እንደገና መጀመር ትችላለህ፤ \
ማገገም ቀጥተኛ መንገድ አይደለም። እዚህ መሆንህ ራሱ ለውጥ እንደምትፈልግ ያሳያል።";

const PROFESSIONAL_HELP_REPLY: &str = "<b>📞 የባለሙያ እርዳታ</b>\n\n\
ብቻህን መታገል የለብህም። በአቅራቢያህ ያለ ጤና ጣቢያ ወይም ሆስፒታል ሄደህ \
የአእምሮ ጤና ባለሙያ እንዲያይህ ጠይቅ።\n\n\
<b>አስቸኳይ ሁኔታ ከሆነ</b> ወዲያውኑ ወደ ቅርብ የድንገተኛ ክፍል ሂድ ወይም ለቤተሰብህ ደውል።";

const ABOUT_REPLY: &str = "ℹ️ ስለ ቦቱ\n\n\
ይህ ቦት ከሱስ ለማገገም ለሚታገሉ ሰዎች አጫጭር ምክሮችንና የማረጋጊያ ልምምዶችን ያቀርባል። \
የሕክምና ባለሙያን አይተካም። ምንም ዓይነት የግል መረጃ አይቀመጥም።";
